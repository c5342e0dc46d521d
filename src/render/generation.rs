use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

/// Monotonic render sequence shared by a compositor and everything presenting its frames.
#[derive(Clone, Debug, Default)]
pub struct GenerationCounter(Arc<AtomicU64>);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Proof of which render a result belongs to.
pub struct RenderTicket {
    pub generation: u64,
}

impl GenerationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new render; every previously issued ticket becomes stale.
    pub fn issue(&self) -> RenderTicket {
        let generation = self.0.fetch_add(1, Ordering::SeqCst) + 1;
        RenderTicket { generation }
    }

    /// Latest issued generation (0 before the first render).
    pub fn latest(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, ticket: RenderTicket) -> bool {
        self.latest() == ticket.generation
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/generation.rs"]
mod tests;
