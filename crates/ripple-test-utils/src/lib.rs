//! Test utilities and fixture visitors for Ripple development.
//!
//! Provides standard graph shapes (see [`fixtures`]) and visitors that
//! record what an engine did to them, so engine and algorithm tests can
//! compare runs without writing their own bookkeeping.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Mutex;

use ripple_core::{Edge, NodeId};
use ripple_propagator::{Visitor, WaveContext};

/// Follows every edge and records what each wave visited.
///
/// Safe to share between workers: visit counts are atomic and the
/// in-wave log sits behind a mutex. [`waves`](Self::waves) holds one
/// sorted entry per completed wave.
pub struct RecordingVisitor {
    hits: Vec<AtomicU32>,
    current: Mutex<Vec<NodeId>>,
    selected: AtomicUsize,
    waves: Vec<Vec<NodeId>>,
    starts: usize,
}

impl RecordingVisitor {
    /// A recorder for node ids `0..bound`.
    pub fn new(bound: usize) -> Self {
        Self {
            hits: (0..bound).map(|_| AtomicU32::new(0)).collect(),
            current: Mutex::new(Vec::new()),
            selected: AtomicUsize::new(0),
            waves: Vec::new(),
            starts: 0,
        }
    }

    /// Nodes visited in each completed wave, sorted ascending.
    pub fn waves(&self) -> &[Vec<NodeId>] {
        &self.waves
    }

    /// Total `visit` calls for `node` across all waves.
    pub fn hits(&self, node: NodeId) -> u32 {
        self.hits[node.index()].load(Ordering::Relaxed)
    }

    /// Total `select` calls across all waves.
    pub fn selected(&self) -> usize {
        self.selected.load(Ordering::Relaxed)
    }

    /// Number of `start` calls seen.
    pub fn starts(&self) -> usize {
        self.starts
    }
}

impl Visitor for RecordingVisitor {
    fn start(&mut self, _: &WaveContext<'_>) {
        self.starts += 1;
    }

    fn select(&self, _: &Edge, _: &WaveContext<'_>) -> bool {
        self.selected.fetch_add(1, Ordering::Relaxed);
        true
    }

    fn visit(&self, node: NodeId, _: &WaveContext<'_>) {
        self.hits[node.index()].fetch_add(1, Ordering::Relaxed);
        self.current
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(node);
    }

    fn end(&mut self, _: &WaveContext<'_>) {
        let current = self
            .current
            .get_mut()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut wave = std::mem::take(current);
        wave.sort_unstable();
        self.waves.push(wave);
    }
}

/// Follows every edge and panics when it reaches `target`.
///
/// Used to drive engines into the poisoned state.
pub struct PanickingVisitor {
    pub target: NodeId,
}

impl PanickingVisitor {
    pub fn new(target: NodeId) -> Self {
        Self { target }
    }
}

impl Visitor for PanickingVisitor {
    fn select(&self, _: &Edge, _: &WaveContext<'_>) -> bool {
        true
    }

    fn visit(&self, node: NodeId, _: &WaveContext<'_>) {
        if node == self.target {
            panic!("visitor refused node {node}");
        }
    }
}
