use serde::{Deserialize, Serialize};

/// A recorded head position and the width it was drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailPoint {
    pub x: f32,
    pub y: f32,
    pub width: f32,
}

/// One entry of a trail: a recorded point, or a break between two runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TrailEntry {
    Point(TrailPoint),
    Gap,
}

/// Ordered path of a cycle, append-only during a round.
///
/// Never starts with a gap and never holds two gaps in a row, so every
/// gap separates two (possibly still empty) runs of points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trail {
    entries: Vec<TrailEntry>,
}

impl Trail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[TrailEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push_point(&mut self, point: TrailPoint) {
        self.entries.push(TrailEntry::Point(point));
    }

    /// Record a break. Collapses into an existing trailing gap and is
    /// dropped on an empty trail. Returns whether an entry was added.
    pub fn push_gap(&mut self) -> bool {
        match self.entries.last() {
            None | Some(TrailEntry::Gap) => false,
            Some(TrailEntry::Point(_)) => {
                self.entries.push(TrailEntry::Gap);
                true
            },
        }
    }

    pub fn last_point(&self) -> Option<TrailPoint> {
        self.entries.iter().rev().find_map(|e| match e {
            TrailEntry::Point(p) => Some(*p),
            TrailEntry::Gap => None,
        })
    }

    /// Recorded points in insertion order, gaps skipped.
    pub fn points(&self) -> impl DoubleEndedIterator<Item = &TrailPoint> {
        self.entries.iter().filter_map(|e| match e {
            TrailEntry::Point(p) => Some(p),
            TrailEntry::Gap => None,
        })
    }

    /// Points eligible for collision tests, skipping the `recent` newest.
    pub fn points_excluding_recent(&self, recent: usize) -> impl Iterator<Item = &TrailPoint> {
        self.points().rev().skip(recent)
    }

    /// Maximal runs of consecutive points, for drawing polylines.
    pub fn segments(&self) -> impl Iterator<Item = Vec<TrailPoint>> + '_ {
        self.entries
            .split(|e| matches!(e, TrailEntry::Gap))
            .filter(|run| !run.is_empty())
            .map(|run| {
                run.iter()
                    .filter_map(|e| match e {
                        TrailEntry::Point(p) => Some(*p),
                        TrailEntry::Gap => None,
                    })
                    .collect()
            })
    }

    /// Drop all history and keep a single anchor point.
    pub fn reset_to(&mut self, anchor: TrailPoint) {
        self.entries.clear();
        self.entries.push(TrailEntry::Point(anchor));
    }

    /// Replace the newest entry with `point`, closing the previous run with
    /// a gap so no line joins the old position to the new one.
    pub fn relocate_head(&mut self, point: TrailPoint) {
        if let Some(TrailEntry::Point(_)) = self.entries.last() {
            self.entries.pop();
        }
        self.push_gap();
        self.push_point(point);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
