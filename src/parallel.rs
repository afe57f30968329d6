use std::thread;
use std::sync::mpsc;
use std::sync::{ Arc, Mutex };

use crate::world::World;
use crate::camera::Camera;
use crate::canvas::Canvas;

pub enum Message {
    Pixel(usize, usize),
    Terminate,
}

struct Worker {
    thread: Option<thread::JoinHandle<()>>,
}

impl Worker {
    fn new(world: Arc<World>, camera: Arc<Camera>, canvas: Arc<Mutex<Canvas>>,
        receiver: Arc<Mutex<mpsc::Receiver<Message>>>) -> Worker {

        let thread = thread::spawn(move || loop {
            // Obtain the message being executed.
            let message: Message = receiver.lock().unwrap().recv().unwrap();

            match message {
                Message::Pixel(x, y) => {
                    // Trace a pixel and store it on the canvas. Trace calls
                    // only read the world, so workers need no coordination
                    // beyond the canvas lock.
                    let ray = camera.ray_for_pixel(x, y);
                    let color = world.trace(&ray, 0);
                    canvas.lock().unwrap().write_pixel(x, y, &color);
                },

                Message::Terminate => {
                    // Exit the worker thread loop, terminating the thread.
                    break;
                }
            }
        });

        Worker { thread: Some(thread) }
    }
}

pub struct ThreadPool {
    workers: Vec<Worker>,
    sender: mpsc::Sender<Message>,
}

impl ThreadPool {
    pub fn new(size: usize, world: World, camera: Camera,
        canvas: Arc<Mutex<Canvas>>) -> ThreadPool {
        // There should be at least one thread to run workers.
        assert!(size > 0);

        let (sender, receiver) = mpsc::channel();

        let world = Arc::new(world);
        let camera = Arc::new(camera);
        let receiver = Arc::new(Mutex::new(receiver));

        let mut workers = Vec::with_capacity(size);

        for _ in 0..size {
            workers.push(Worker::new(
                Arc::clone(&world),
                Arc::clone(&camera),
                Arc::clone(&canvas),
                Arc::clone(&receiver)
            ));
        }

        ThreadPool { workers, sender }
    }

    pub fn execute(&mut self, message: Message) {
        self.sender.send(message).unwrap();
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        for _ in &self.workers {
            self.sender.send(Message::Terminate).unwrap();
        }

        for worker in &mut self.workers {
            if let Some(thread) = worker.thread.take() {
                thread.join().unwrap();
            }
        }
    }
}

/// Renders a world across `num_threads` worker threads.
///
/// Every pixel is an independent trace over the read-only world, so the
/// only shared mutable state is the canvas. The result is identical to the
/// serial `Camera::render`.
pub fn parallel_render(world: World, camera: Camera, num_threads: usize)
    -> Canvas {
    let hsize = camera.width;
    let vsize = camera.height;
    let canvas = Arc::new(Mutex::new(Canvas::new(hsize, vsize)));

    log::info!("rendering with {} threads", num_threads);
    {
        let mut thread_pool = ThreadPool::new(
            num_threads, world, camera, Arc::clone(&canvas)
        );

        for y in 0..vsize {
            for x in 0..hsize {
                thread_pool.execute(Message::Pixel(x, y));
            }
        }
    }

    // The pool has been dropped and its workers joined; this canvas handle
    // is the only one left.
    let canvas = Arc::try_unwrap(canvas)
        .expect("Render workers should have exited.");
    canvas.into_inner().expect("Canvas mutex should not be poisoned.")
}

/* Tests */

#[test]
fn parallel_render_matches_serial_render() {
    use crate::vector::{ Vector3, Color };
    use crate::sphere::Sphere;

    let mut middle = Sphere::new(Vector3::new(0.0, 0.0, -20.0), 4.0,
        Color::new(1.0, 0.32, 0.36));
    middle.reflectivity = 1.0;
    middle.transparency = 0.5;

    let ground = Sphere::new(Vector3::new(0.0, -10004.0, -20.0), 10000.0,
        Color::new(0.2, 0.2, 0.2));

    let mut light = Sphere::new(Vector3::new(0.0, 20.0, -30.0), 3.0,
        Color::zero());
    light.emission_color = Color::new(3.0, 3.0, 3.0);

    let world = World::new(vec![ground, middle, light]);
    let camera = Camera::new(20, 15, 30.0);

    let serial = camera.render(&world);
    let parallel = parallel_render(world, camera, 3);

    assert_eq!(serial, parallel);
}
