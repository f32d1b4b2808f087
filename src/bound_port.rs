use rocket::fairing::Info;
use rocket::{Orbit, Rocket};
use std::sync::Mutex;
use tokio::sync::oneshot;

/// When the application is configured with port 0, the OS picks the real port
/// at bind time. This pair of types carries it from Rocket's liftoff back to
/// whoever built the application (in practice, the test harness).
pub fn pair() -> (PortReporter, BoundPort) {
    let (tx, rx) = oneshot::channel();
    (
        PortReporter {
            sender: Mutex::new(Some(tx)),
        },
        BoundPort {
            port: Mutex::new(None),
            rx: Mutex::new(Some(rx)),
        },
    )
}

pub struct BoundPort {
    port: Mutex<Option<u16>>,
    rx: Mutex<Option<oneshot::Receiver<u16>>>,
}

impl BoundPort {
    /// Waits for liftoff the first time; cached afterwards.
    pub async fn get(&self) -> u16 {
        if let Some(port) = *self.port.lock().unwrap() {
            return port;
        }
        let rx = self
            .rx
            .lock()
            .unwrap()
            .take()
            .expect("Bound port receiver already consumed");
        let port = rx.await.expect("Server dropped before liftoff");
        *self.port.lock().unwrap() = Some(port);
        port
    }
}

pub struct PortReporter {
    sender: Mutex<Option<oneshot::Sender<u16>>>,
}

#[rocket::async_trait]
impl rocket::fairing::Fairing for PortReporter {
    fn info(&self) -> Info {
        Info {
            name: "Port Reporter",
            kind: rocket::fairing::Kind::Liftoff,
        }
    }

    async fn on_liftoff(&self, rocket: &Rocket<Orbit>) {
        if let Some(sender) = self.sender.lock().unwrap().take() {
            let _ = sender.send(rocket.config().port);
        }
    }
}
