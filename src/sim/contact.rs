// Contact detection collaborator
//
// The combat core does not own broad/narrow-phase collision detection; it
// consumes contacts from a detector behind the `ContactDetector` trait. The
// provided implementation runs parry2d ball-ball contact queries over the
// active discs, which is all a four-top arena needs. Pair tracking turns raw
// per-tick contacts into Started vs Persisted phases so a physical contact
// is fully resolved exactly once.

use std::collections::HashSet;

use glam::Vec2;
use parry2d::math::Isometry;
use parry2d::query;
use parry2d::shape::Ball;

use crate::game::combat::body::PlayerId;

/// Collision footprint of one top for this tick
#[derive(Debug, Clone, Copy)]
pub struct DiscProfile {
    pub id: PlayerId,
    pub center: Vec2,
    pub radius: f32,
}

/// One detected contact between two discs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactPair {
    pub first: PlayerId,
    pub second: PlayerId,
    /// Contact normal pointing from `first` toward `second`
    pub normal: Vec2,
    /// Contact point on the surface of `first`
    pub point: Vec2,
}

impl ContactPair {
    /// Order-independent key for pair tracking
    fn key(&self) -> (PlayerId, PlayerId) {
        if self.first <= self.second {
            (self.first, self.second)
        } else {
            (self.second, self.first)
        }
    }
}

/// Whether a contact is fresh this tick or carried over from the last one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPhase {
    /// First tick the pair touches: full resolution
    Started,
    /// Pair was already touching last tick: grind only
    Persisted,
}

/// Produces the deduplicated contact set for one tick
pub trait ContactDetector {
    fn detect(&self, discs: &[DiscProfile]) -> Vec<ContactPair>;
}

/// Narrow-phase disc detector backed by parry2d ball-ball queries
#[derive(Debug, Clone)]
pub struct DiscContactDetector {
    /// Extra detection distance; 0.0 means touching-or-overlapping only
    prediction: f32,
}

impl DiscContactDetector {
    pub fn new() -> Self {
        Self { prediction: 0.0 }
    }

    pub fn with_prediction(prediction: f32) -> Self {
        Self { prediction }
    }
}

impl Default for DiscContactDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactDetector for DiscContactDetector {
    fn detect(&self, discs: &[DiscProfile]) -> Vec<ContactPair> {
        let mut pairs = Vec::new();
        for (i, a) in discs.iter().enumerate() {
            for b in &discs[i + 1..] {
                let iso_a = Isometry::translation(a.center.x, a.center.y);
                let iso_b = Isometry::translation(b.center.x, b.center.y);
                let ball_a = Ball::new(a.radius);
                let ball_b = Ball::new(b.radius);

                let Ok(Some(contact)) =
                    query::contact(&iso_a, &ball_a, &iso_b, &ball_b, self.prediction)
                else {
                    continue;
                };
                pairs.push(ContactPair {
                    first: a.id,
                    second: b.id,
                    normal: Vec2::new(contact.normal1.x, contact.normal1.y),
                    point: Vec2::new(contact.point1.x, contact.point1.y),
                });
            }
        }
        pairs
    }
}

/// Tracks which pairs were touching last tick
#[derive(Debug, Default)]
pub struct ContactTracker {
    previous: HashSet<(PlayerId, PlayerId)>,
}

impl ContactTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify a contact against last tick's pair set
    pub fn phase(&self, pair: &ContactPair) -> ContactPhase {
        if self.previous.contains(&pair.key()) {
            ContactPhase::Persisted
        } else {
            ContactPhase::Started
        }
    }

    /// Replace the tracked set with this tick's contacts
    pub fn commit(&mut self, pairs: &[ContactPair]) {
        self.previous.clear();
        self.previous.extend(pairs.iter().map(ContactPair::key));
    }

    /// Forget all pairs (between rounds)
    pub fn clear(&mut self) {
        self.previous.clear();
    }
}
