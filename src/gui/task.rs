// src/gui/task.rs
//
// One background computation whose single result the UI picks up on a later
// frame. The worker requests a repaint when done.

use std::{
    sync::mpsc::{self, Receiver, TryRecvError},
    thread,
};

use eframe::egui;

pub struct Task<T> {
    rx: Receiver<T>,
}

impl<T: Send + 'static> Task<T> {
    pub fn spawn<F>(ctx: &egui::Context, job: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let ctx2 = ctx.clone();
        thread::spawn(move || {
            let _ = tx.send(job());
            ctx2.request_repaint();
        });
        Self { rx }
    }
}

impl<T> Task<T> {
    /// `Some(Ok(v))` once finished; `Some(Err(()))` if the worker died.
    pub fn poll(&self) -> Option<Result<T, ()>> {
        match self.rx.try_recv() {
            Ok(v) => Some(Ok(v)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(())),
        }
    }
}
