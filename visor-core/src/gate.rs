//! Loading-mode gate
//!
//! Sits in front of the operation queue. In [`LoadingMode::Lazy`] screen
//! uploads are held back until a screen is shown, so a host can register a
//! large set of screens without paying for the ones never displayed:
//!
//! ```text
//! enqueue:  AddScreen(A)  AddScreen(B)  ShowScreen(C)
//! forward:                              A  B  C
//! ```
//!
//! The mode is read when each operation arrives; changing it neither
//! flushes nor discards what is already held.

use heapless::Vec;

use crate::config::LoadingMode;
use crate::operation::Operation;

/// Screen uploads that can be held at once
pub const MAX_PENDING_SCREENS: usize = 8;

/// Deferral state
#[derive(Debug)]
pub struct LoadingGate {
    mode: LoadingMode,
    pending: Vec<Operation, MAX_PENDING_SCREENS>,
}

impl LoadingGate {
    pub fn new(mode: LoadingMode) -> Self {
        Self {
            mode,
            pending: Vec::new(),
        }
    }

    pub fn mode(&self) -> LoadingMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: LoadingMode) {
        self.mode = mode;
    }

    /// Number of held screen uploads
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// How many operations [`admit`](Self::admit) would forward for
    /// `operation` in the current state
    pub fn forwards(&self, operation: &Operation) -> usize {
        match operation {
            Operation::AddScreen(_) if self.holds_uploads() => usize::from(self.pending.is_full()),
            Operation::ShowScreen { .. } => self.pending.len() + 1,
            _ => 1,
        }
    }

    fn holds_uploads(&self) -> bool {
        self.mode == LoadingMode::Lazy
    }

    /// Admit an operation, calling `forward` for everything that may proceed
    ///
    /// A `ShowScreen` releases every held upload, in arrival order, before
    /// it is forwarded itself.
    pub fn admit<F>(&mut self, operation: Operation, mut forward: F)
    where
        F: FnMut(Operation),
    {
        let is_upload = matches!(operation, Operation::AddScreen(_));
        let is_show = matches!(operation, Operation::ShowScreen { .. });

        if is_upload && self.holds_uploads() {
            if let Err(operation) = self.pending.push(operation) {
                warn!("pending screen list full, uploading immediately");
                forward(operation);
            }
        } else if is_show {
            let held = core::mem::take(&mut self.pending);
            if !held.is_empty() {
                debug!("flushing {} held screen(s)", held.len());
            }
            for pending in held {
                forward(pending);
            }
            forward(operation);
        } else {
            forward(operation);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::OperationKind;
    use proptest::prelude::*;
    use visor_layout::Screen;

    fn add(id: u8) -> Operation {
        Operation::AddScreen(Screen::builder(id).build())
    }

    fn show(id: u8) -> Operation {
        Operation::show_screen(id, "").unwrap()
    }

    /// Ids of forwarded screen operations, in forwarding order
    fn run(gate: &mut LoadingGate, ops: impl IntoIterator<Item = Operation>) -> std::vec::Vec<u8> {
        let mut forwarded = std::vec::Vec::new();
        for op in ops {
            gate.admit(op, |op| match op {
                Operation::AddScreen(screen) => forwarded.push(screen.id()),
                Operation::ShowScreen { id, .. } => forwarded.push(id),
                other => panic!("unexpected {:?}", other.kind()),
            });
        }
        forwarded
    }

    #[test]
    fn test_lazy_holds_until_show() {
        let mut gate = LoadingGate::new(LoadingMode::Lazy);

        assert!(run(&mut gate, [add(11), add(12)]).is_empty());
        assert_eq!(gate.pending(), 2);

        assert_eq!(run(&mut gate, [show(13)]), [11, 12, 13]);
        assert_eq!(gate.pending(), 0);
    }

    #[test]
    fn test_normal_forwards_immediately() {
        let mut gate = LoadingGate::new(LoadingMode::Normal);
        let mut calls = 0;
        for op in [add(11), add(12), show(13)] {
            let before = calls;
            gate.admit(op, |_| calls += 1);
            assert_eq!(calls, before + 1);
        }
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_other_operations_pass_through_lazy() {
        let mut gate = LoadingGate::new(LoadingMode::Lazy);
        let mut kinds = std::vec::Vec::new();
        gate.admit(add(11), |op| kinds.push(op.kind()));
        gate.admit(Operation::GetBattery, |op| kinds.push(op.kind()));
        assert_eq!(kinds, [OperationKind::GetBattery]);
        assert_eq!(gate.pending(), 1);
    }

    #[test]
    fn test_mode_switch_is_not_retroactive() {
        let mut gate = LoadingGate::new(LoadingMode::Lazy);
        assert!(run(&mut gate, [add(11)]).is_empty());

        gate.set_mode(LoadingMode::Normal);
        assert_eq!(gate.pending(), 1);
        // New uploads pass straight through, the held one stays held
        assert_eq!(run(&mut gate, [add(12)]), [12]);
        assert_eq!(run(&mut gate, [show(20)]), [11, 20]);
    }

    #[test]
    fn test_forward_counts_match_admit() {
        let mut gate = LoadingGate::new(LoadingMode::Lazy);
        for id in 10..10 + MAX_PENDING_SCREENS as u8 {
            let op = add(id);
            let expected = gate.forwards(&op);
            assert_eq!(run(&mut gate, [op]).len(), expected);
        }
        assert_eq!(gate.forwards(&add(30)), 1);
        assert_eq!(gate.forwards(&Operation::GetBattery), 1);

        let op = show(31);
        assert_eq!(gate.forwards(&op), MAX_PENDING_SCREENS + 1);
        assert_eq!(run(&mut gate, [op]).len(), MAX_PENDING_SCREENS + 1);

        gate.set_mode(LoadingMode::Normal);
        assert_eq!(gate.forwards(&add(32)), 1);
        assert_eq!(gate.forwards(&show(32)), 1);
    }

    #[test]
    fn test_overflow_forwards_directly() {
        let mut gate = LoadingGate::new(LoadingMode::Lazy);
        let ops = (0..MAX_PENDING_SCREENS as u8 + 1).map(|i| add(10 + i));
        let forwarded = run(&mut gate, ops);
        assert_eq!(forwarded, [10 + MAX_PENDING_SCREENS as u8]);
        assert_eq!(gate.pending(), MAX_PENDING_SCREENS);
    }

    proptest! {
        #[test]
        fn prop_lazy_flush_keeps_arrival_order(
            ids in prop::collection::vec(10u8..60, 0..=MAX_PENDING_SCREENS),
            shown in 10u8..60,
        ) {
            let mut gate = LoadingGate::new(LoadingMode::Lazy);
            let held = run(&mut gate, ids.iter().map(|&id| add(id)));
            prop_assert!(held.is_empty());

            let mut expected = ids.clone();
            expected.push(shown);
            prop_assert_eq!(run(&mut gate, [show(shown)]), expected);
            prop_assert_eq!(gate.pending(), 0);
        }
    }
}
