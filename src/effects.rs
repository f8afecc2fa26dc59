use rand::{seq::SliceRandom, Rng};
use std::time::Duration;

use crate::config::{EffectsConfig, IncorrectKind, Motion};

const CONFETTI_SYMBOLS: [char; 6] = ['*', '+', '•', '✦', '✶', '❋'];
const CONFETTI_COUNT: usize = 60;
const GRAVITY: f64 = 15.0;

/// Short-lived feedback shown around the cards after a submit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Correct(Motion),
    Incorrect {
        kind: IncorrectKind,
        overlay_size_pct: Option<u8>,
    },
}

#[derive(Debug, Clone)]
pub struct ConfettiParticle {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub symbol: char,
    pub color_index: usize,
    pub age: f64,
    pub max_age: f64,
}

impl ConfettiParticle {
    fn new<R: Rng>(x: f64, y: f64, rng: &mut R) -> Self {
        Self {
            x,
            y,
            vel_x: rng.gen_range(-6.0..6.0),
            vel_y: rng.gen_range(-8.0..-2.0),
            symbol: *CONFETTI_SYMBOLS.choose(rng).unwrap_or(&'*'),
            color_index: rng.gen_range(0..7),
            age: 0.0,
            max_age: rng.gen_range(1.5..3.0),
        }
    }

    /// Returns false once the particle has burnt out
    fn update(&mut self, dt: f64) -> bool {
        self.x += self.vel_x * dt;
        self.y += self.vel_y * dt;
        self.vel_y += GRAVITY * dt;
        self.age += dt;
        self.age < self.max_age
    }

    pub fn fade(&self) -> f64 {
        1.0 - (self.age / self.max_age).min(1.0)
    }
}

/// Burst of particles for a perfect round
#[derive(Debug, Default)]
pub struct Confetti {
    pub particles: Vec<ConfettiParticle>,
    width: f64,
    height: f64,
}

impl Confetti {
    pub fn burst(&mut self, width: u16, height: u16) {
        let mut rng = rand::thread_rng();
        self.width = width as f64;
        self.height = height as f64;
        let cx = self.width / 2.0;
        let cy = self.height / 3.0;
        self.particles = (0..CONFETTI_COUNT)
            .map(|_| {
                let x = cx + rng.gen_range(-10.0..10.0);
                let y = cy + rng.gen_range(-3.0..3.0);
                ConfettiParticle::new(x, y, &mut rng)
            })
            .collect();
    }

    pub fn is_active(&self) -> bool {
        !self.particles.is_empty()
    }

    pub fn update(&mut self, dt: f64) {
        let (width, height) = (self.width, self.height);
        self.particles.retain_mut(|p| {
            let alive = p.update(dt);
            let buffer = 5.0;
            let off_screen = p.y > height + buffer || p.x < -buffer || p.x > width + buffer;
            alive && !off_screen
        });
    }
}

/// Host-side effect playback, configured from `effects` in the app config
#[derive(Debug)]
pub struct EffectsLayer {
    config: EffectsConfig,
    feedback: Option<(Feedback, Duration)>,
    pub confetti: Confetti,
}

impl EffectsLayer {
    pub fn new(config: EffectsConfig) -> Self {
        Self {
            config,
            feedback: None,
            confetti: Confetti::default(),
        }
    }

    fn duration(&self) -> Duration {
        Duration::from_millis(self.config.duration_ms())
    }

    pub fn on_correct(&mut self) {
        let motion = self.config.correct_motion();
        if motion != Motion::None {
            self.feedback = Some((Feedback::Correct(motion), self.duration()));
        }
    }

    pub fn on_incorrect(&mut self) {
        let kind = self.config.incorrect_kind();
        if kind != IncorrectKind::None {
            let overlay_size_pct = self.config.incorrect.and_then(|i| i.overlay_size_pct());
            self.feedback = Some((
                Feedback::Incorrect {
                    kind,
                    overlay_size_pct,
                },
                self.duration(),
            ));
        }
    }

    /// Starts the confetti burst when configured; returns whether it did
    pub fn on_perfect_round(&mut self, width: u16, height: u16) -> bool {
        if !self.config.confetti_on_complete() {
            return false;
        }
        self.confetti.burst(width, height);
        true
    }

    pub fn feedback(&self) -> Option<Feedback> {
        self.feedback.map(|(f, _)| f)
    }

    /// Horizontal offset for a shaking input line, alternating each 100ms
    pub fn shake_offset(&self) -> i16 {
        match self.feedback {
            Some((
                Feedback::Incorrect {
                    kind: IncorrectKind::Shake,
                    ..
                },
                left,
            )) => {
                if (left.as_millis() / 100) % 2 == 0 {
                    2
                } else {
                    -2
                }
            }
            _ => 0,
        }
    }

    pub fn is_animating(&self) -> bool {
        self.feedback.is_some() || self.confetti.is_active()
    }

    pub fn update(&mut self, elapsed: Duration) {
        if let Some((_, left)) = self.feedback.as_mut() {
            *left = left.saturating_sub(elapsed);
            if left.is_zero() {
                self.feedback = None;
            }
        }
        self.confetti.update(elapsed.as_secs_f64());
    }

    pub fn clear(&mut self) {
        self.feedback = None;
        self.confetti.particles.clear();
    }
}
