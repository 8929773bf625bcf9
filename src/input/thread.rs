use crossterm::event::{self, Event};
use std::io;
use std::sync::mpsc::{self, Receiver};

#[derive(Debug)]
pub enum InputMessage {
    Event(Event),
    ReadError(String),
}

pub type InputReceiver = Receiver<InputMessage>;

/// Key and resize events are all the viewer reacts to.
fn is_forwarded(ev: &Event) -> bool {
    matches!(ev, Event::Key(_) | Event::Resize(_, _))
}

/// Blocks on terminal events off the render thread. The thread exits once
/// the receiver is dropped or reading fails.
pub fn spawn_input_thread() -> io::Result<InputReceiver> {
    let (tx, rx) = mpsc::channel();
    std::thread::Builder::new()
        .name("pixelpoint-input".to_string())
        .spawn(move || loop {
            match event::read() {
                Ok(ev) if is_forwarded(&ev) => {
                    if tx.send(InputMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(err) => {
                    let _ = tx.send(InputMessage::ReadError(err.to_string()));
                    break;
                }
            }
        })?;
    Ok(rx)
}
