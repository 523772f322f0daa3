use std::sync::mpsc::{self, Receiver, SendError, Sender, TryRecvError};

use crate::geom::{Color, Vertex};

/// Stroke mutation recorded by an input callback and applied on the render side.
#[derive(Debug, Clone, PartialEq)]
pub enum StrokeCommand {
    Start {
        color: Color,
        /// `None` uses the renderer's configured thickness.
        thickness: Option<f32>,
    },
    Append(Vertex),
    AppendMany(Vec<Vertex>),
    Finish,
}

/// Producer half of the stroke queue. Cheap to clone; usable from any thread.
#[derive(Debug, Clone)]
pub struct StrokeSender {
    tx: Sender<StrokeCommand>,
}

/// Consumer half, drained once per frame by the renderer's owner.
#[derive(Debug)]
pub struct StrokeInbox {
    rx: Receiver<StrokeCommand>,
}

/// Creates a connected sender/inbox pair.
pub fn stroke_channel() -> (StrokeSender, StrokeInbox) {
    let (tx, rx) = mpsc::channel();
    (StrokeSender { tx }, StrokeInbox { rx })
}

impl StrokeSender {
    /// Fails only when the inbox was dropped.
    pub fn send(&self, cmd: StrokeCommand) -> Result<(), SendError<StrokeCommand>> {
        self.tx.send(cmd)
    }

    pub fn start_stroke(&self, color: Color) -> Result<(), SendError<StrokeCommand>> {
        self.send(StrokeCommand::Start {
            color,
            thickness: None,
        })
    }

    pub fn append(&self, vertex: Vertex) -> Result<(), SendError<StrokeCommand>> {
        self.send(StrokeCommand::Append(vertex))
    }

    pub fn finish_stroke(&self) -> Result<(), SendError<StrokeCommand>> {
        self.send(StrokeCommand::Finish)
    }
}

impl StrokeInbox {
    /// Next pending command without blocking.
    pub fn try_next(&self) -> Option<StrokeCommand> {
        match self.rx.try_recv() {
            Ok(cmd) => Some(cmd),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_arrive_in_order_across_threads() {
        let (tx, inbox) = stroke_channel();

        let worker = {
            let tx = tx.clone();
            std::thread::spawn(move || {
                tx.start_stroke(Color::red()).unwrap();
                for i in 0..3 {
                    tx.append(Vertex::from_xyz(i as f32, 0.0, 0.0, Color::red()))
                        .unwrap();
                }
                tx.finish_stroke().unwrap();
            })
        };
        worker.join().unwrap();

        let cmds: Vec<_> = std::iter::from_fn(|| inbox.try_next()).collect();
        assert_eq!(cmds.len(), 5);
        assert!(matches!(cmds[0], StrokeCommand::Start { color, thickness: None } if color == Color::red()));
        assert!(matches!(cmds[4], StrokeCommand::Finish));
        assert!(inbox.try_next().is_none());
    }

    #[test]
    fn send_fails_after_inbox_dropped() {
        let (tx, inbox) = stroke_channel();
        drop(inbox);
        assert!(tx.finish_stroke().is_err());
    }
}
