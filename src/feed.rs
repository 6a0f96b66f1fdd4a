//! Live-feed translation (host side)
//!
//! Turns audience events into typed `Command`s and hands them to the
//! simulation thread through a channel. The simulation never sees raw text
//! and keeps running when the feed is silent or gone.

use std::sync::mpsc::{self, Receiver, Sender};

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::BOOST_FACTOR;
use crate::sim::{Command, PALETTE, Rgb};

/// An event from the live audience feed
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    Connected,
    /// A gift; streakable gifts only count once the streak ends
    Gift {
        user: String,
        streakable: bool,
        streaking: bool,
    },
    Comment {
        user: String,
        text: String,
    },
}

/// Stateful translator (owns the RNG for unknown color names)
#[derive(Debug, Clone)]
pub struct FeedTranslator {
    rng: Pcg32,
}

impl FeedTranslator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn translate(&mut self, event: &FeedEvent) -> Option<Command> {
        match event {
            FeedEvent::Connected => {
                log::info!("Connected to live feed");
                None
            }
            FeedEvent::Gift {
                user,
                streakable,
                streaking,
            } => {
                if *streakable && *streaking {
                    return None;
                }
                log::info!("{user} sent a gift");
                Some(Command::Spawn {
                    name: user.clone(),
                    color: None,
                })
            }
            FeedEvent::Comment { user, text } => self.parse_comment(user, text),
        }
    }

    /// Parse a chat comment. Anything that isn't a known `!command` is chatter.
    pub fn parse_comment(&mut self, user: &str, text: &str) -> Option<Command> {
        let text = text.trim().to_lowercase();
        let arg = text.split_whitespace().nth(1);

        if text.starts_with("!spawn") {
            Some(Command::Spawn {
                name: user.to_string(),
                color: None,
            })
        } else if text.starts_with("!boost") {
            Some(Command::Boost {
                name: user.to_string(),
                factor: BOOST_FACTOR,
            })
        } else if text.starts_with("!color") {
            let color = match arg {
                None => Rgb::RED,
                Some(name) => Rgb::from_name(name)
                    .unwrap_or_else(|| PALETTE[self.rng.random_range(0..PALETTE.len())]),
            };
            Some(Command::SetColor {
                name: user.to_string(),
                color,
            })
        } else if text.starts_with("!gravity") {
            let value = match arg {
                None => 0.0,
                Some(raw) => match raw.parse::<f32>() {
                    Ok(v) => v,
                    Err(_) => {
                        log::warn!("{user} provided invalid gravity value {raw:?}");
                        return None;
                    }
                },
            };
            Some(Command::SetGravity { value })
        } else {
            None
        }
    }
}

/// Parse a line of the plain-text feed used by the headless host.
///
/// `gift <user>` is a gift; `<user> <comment...>` is a comment.
pub fn parse_line(line: &str) -> Option<FeedEvent> {
    let line = line.trim();
    let (head, rest) = line.split_once(char::is_whitespace)?;
    let rest = rest.trim();
    if rest.is_empty() {
        return None;
    }
    if head.eq_ignore_ascii_case("gift") {
        return Some(FeedEvent::Gift {
            user: rest.to_string(),
            streakable: false,
            streaking: false,
        });
    }
    Some(FeedEvent::Comment {
        user: head.to_string(),
        text: rest.to_string(),
    })
}

/// Multi-producer hand-off from feed threads to the simulation thread
#[derive(Debug)]
pub struct CommandQueue {
    tx: Sender<Command>,
    rx: Receiver<Command>,
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }

    /// A sender for a producer thread
    pub fn sender(&self) -> Sender<Command> {
        self.tx.clone()
    }

    /// Take every command queued so far, without blocking
    pub fn drain(&self) -> Vec<Command> {
        self.rx.try_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(text: &str) -> Option<Command> {
        FeedTranslator::new(1).parse_comment("viewer", text)
    }

    #[test]
    fn test_spawn_and_boost() {
        assert_eq!(
            comment("!spawn"),
            Some(Command::Spawn {
                name: "viewer".into(),
                color: None
            })
        );
        assert_eq!(
            comment("!BOOST please"),
            Some(Command::Boost {
                name: "viewer".into(),
                factor: BOOST_FACTOR
            })
        );
        assert_eq!(comment("hello there"), None);
    }

    #[test]
    fn test_color_defaults() {
        assert_eq!(
            comment("!color blue"),
            Some(Command::SetColor {
                name: "viewer".into(),
                color: Rgb::BLUE
            })
        );
        assert_eq!(
            comment("!color"),
            Some(Command::SetColor {
                name: "viewer".into(),
                color: Rgb::RED
            })
        );
        match comment("!color mauve") {
            Some(Command::SetColor { color, .. }) => assert!(PALETTE.contains(&color)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_gravity_parsing() {
        assert_eq!(comment("!gravity 0.5"), Some(Command::SetGravity { value: 0.5 }));
        assert_eq!(comment("!gravity"), Some(Command::SetGravity { value: 0.0 }));
        // Clamping is the simulation's job
        assert_eq!(comment("!gravity 5"), Some(Command::SetGravity { value: 5.0 }));
        assert_eq!(comment("!gravity up"), None);
    }

    #[test]
    fn test_streaking_gift_waits() {
        let mut translator = FeedTranslator::new(1);
        let streaking = FeedEvent::Gift {
            user: "fan".into(),
            streakable: true,
            streaking: true,
        };
        assert_eq!(translator.translate(&streaking), None);

        let done = FeedEvent::Gift {
            user: "fan".into(),
            streakable: true,
            streaking: false,
        };
        assert_eq!(
            translator.translate(&done),
            Some(Command::Spawn {
                name: "fan".into(),
                color: None
            })
        );
        assert_eq!(translator.translate(&FeedEvent::Connected), None);
    }

    #[test]
    fn test_parse_line() {
        assert_eq!(
            parse_line("gift alice"),
            Some(FeedEvent::Gift {
                user: "alice".into(),
                streakable: false,
                streaking: false
            })
        );
        assert_eq!(
            parse_line("bob !color green"),
            Some(FeedEvent::Comment {
                user: "bob".into(),
                text: "!color green".into()
            })
        );
        assert_eq!(parse_line("lonely"), None);
        assert_eq!(parse_line(""), None);
    }

    #[test]
    fn test_queue_hands_off_across_threads() {
        let queue = CommandQueue::new();
        let tx = queue.sender();
        std::thread::spawn(move || {
            tx.send(Command::SetGravity { value: 0.1 }).unwrap();
        })
        .join()
        .unwrap();

        assert_eq!(queue.drain(), vec![Command::SetGravity { value: 0.1 }]);
        assert!(queue.drain().is_empty());
    }
}
