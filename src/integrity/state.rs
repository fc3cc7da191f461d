//! Integrity value with change-only transition reporting
//!
//! `IntegrityChanged` goes out before the new value is stored;
//! `SeverityChanged` only when the derived tier actually moves, and only
//! the net transition of the call is reported.

use crate::integrity::severity::SeverityTable;
use serde::{Deserialize, Serialize};

/// Transition reported while applying a new integrity value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IntegrityTransition<T> {
    Integrity { old: f32, new: f32 },
    Severity { old: T, new: T },
}

/// Summary of a `set_integrity` call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegrityOutcome<T> {
    pub changed: bool,
    pub severity: Option<(T, T)>,
    /// Integrity moved back up to cap from a tier other than intact
    pub restored: bool,
}

impl<T> IntegrityOutcome<T> {
    fn unchanged() -> Self {
        Self {
            changed: false,
            severity: None,
            restored: false,
        }
    }
}

/// Bounded integrity in [0, cap] plus its derived tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntegrityState<T> {
    integrity: f32,
    cap: f32,
    severity: T,
}

impl<T: Copy + Default + PartialEq> IntegrityState<T> {
    /// Fresh state at full integrity
    pub fn new(cap: f32) -> Self {
        let cap = cap.max(0.0);
        Self {
            integrity: cap,
            cap,
            severity: T::default(),
        }
    }

    pub fn integrity(&self) -> f32 {
        self.integrity
    }

    pub fn cap(&self) -> f32 {
        self.cap
    }

    pub fn severity(&self) -> T {
        self.severity
    }

    pub fn is_full(&self) -> bool {
        self.integrity >= self.cap
    }

    /// Fraction of the cap that has been used up
    pub fn consumed_fraction(&self) -> f32 {
        Self::consumed(self.integrity, self.cap)
    }

    fn consumed(integrity: f32, cap: f32) -> f32 {
        if cap <= 0.0 {
            return 0.0;
        }
        1.0 - integrity / cap
    }

    fn derive_tier(&self, bonus: f32, table: &SeverityTable<T>) -> T {
        let effective = (self.integrity + bonus).clamp(0.0, self.cap);
        table.tier_for(Self::consumed(effective, self.cap))
    }

    /// Clamp and store a new integrity value.
    ///
    /// `bonus` is the sum of active integrity modifiers; it masks damage for
    /// tier derivation only and never touches the stored value.
    pub fn set_integrity(
        &mut self,
        value: f32,
        bonus: f32,
        table: &SeverityTable<T>,
        mut emit: impl FnMut(IntegrityTransition<T>),
    ) -> IntegrityOutcome<T> {
        let clamped = value.clamp(0.0, self.cap);
        if clamped == self.integrity {
            return IntegrityOutcome::unchanged();
        }

        let old = self.integrity;
        let was_intact = self.severity == T::default();
        emit(IntegrityTransition::Integrity { old, new: clamped });
        self.integrity = clamped;

        let severity = self.refresh_severity(bonus, table, &mut emit);
        IntegrityOutcome {
            changed: true,
            severity,
            restored: !was_intact && old < self.cap && clamped >= self.cap,
        }
    }

    /// Re-derive the tier, reporting only a real change
    pub fn refresh_severity(
        &mut self,
        bonus: f32,
        table: &SeverityTable<T>,
        mut emit: impl FnMut(IntegrityTransition<T>),
    ) -> Option<(T, T)> {
        let old = self.severity;
        let new = self.derive_tier(bonus, table);
        if new == old {
            return None;
        }
        emit(IntegrityTransition::Severity { old, new });
        self.severity = new;
        Some((old, new))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anatomy::category::WoundSeverity;
    use crate::integrity::severity::SeverityThreshold;

    fn table() -> SeverityTable<WoundSeverity> {
        SeverityTable::new(vec![
            SeverityThreshold::new(WoundSeverity::Minor, 0.1),
            SeverityThreshold::new(WoundSeverity::Moderate, 0.25),
            SeverityThreshold::new(WoundSeverity::Severe, 0.5),
            SeverityThreshold::new(WoundSeverity::Critical, 0.8),
            SeverityThreshold::new(WoundSeverity::Loss, 1.0),
        ])
    }

    #[test]
    fn test_clamps_to_bounds() {
        let mut state = IntegrityState::<WoundSeverity>::new(100.0);
        state.set_integrity(-50.0, 0.0, &table(), |_| {});
        assert_eq!(state.integrity(), 0.0);
        state.set_integrity(500.0, 0.0, &table(), |_| {});
        assert_eq!(state.integrity(), 100.0);
    }

    #[test]
    fn test_unchanged_value_emits_nothing() {
        let mut state = IntegrityState::<WoundSeverity>::new(100.0);
        let mut events = Vec::new();
        let outcome = state.set_integrity(120.0, 0.0, &table(), |t| events.push(t));
        assert!(!outcome.changed);
        assert!(events.is_empty());
    }

    #[test]
    fn test_multi_tier_crossing_reports_net_transition() {
        let mut state = IntegrityState::<WoundSeverity>::new(100.0);
        let mut events = Vec::new();
        state.set_integrity(5.0, 0.0, &table(), |t| events.push(t));

        assert_eq!(events.len(), 2);
        assert_eq!(events[0], IntegrityTransition::Integrity { old: 100.0, new: 5.0 });
        assert_eq!(
            events[1],
            IntegrityTransition::Severity {
                old: WoundSeverity::Healthy,
                new: WoundSeverity::Critical
            }
        );
    }

    #[test]
    fn test_same_tier_damage_skips_severity_event() {
        let mut state = IntegrityState::<WoundSeverity>::new(100.0);
        state.set_integrity(60.0, 0.0, &table(), |_| {});
        let mut events = Vec::new();
        let outcome = state.set_integrity(55.0, 0.0, &table(), |t| events.push(t));
        assert!(outcome.changed);
        assert!(outcome.severity.is_none());
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_restore_flag_only_from_below_cap() {
        let mut state = IntegrityState::<WoundSeverity>::new(100.0);
        state.set_integrity(40.0, 0.0, &table(), |_| {});
        let outcome = state.set_integrity(100.0, 0.0, &table(), |_| {});
        assert!(outcome.restored);
        assert_eq!(outcome.severity, Some((WoundSeverity::Severe, WoundSeverity::Healthy)));

        let again = state.set_integrity(100.0, 0.0, &table(), |_| {});
        assert!(!again.restored);
    }

    #[test]
    fn test_restore_flag_needs_tier_to_leave_intact() {
        let mut state = IntegrityState::<WoundSeverity>::new(100.0);
        state.set_integrity(98.0, 0.0, &table(), |_| {});
        assert_eq!(state.severity(), WoundSeverity::Healthy);

        let outcome = state.set_integrity(100.0, 0.0, &table(), |_| {});
        assert!(outcome.changed);
        assert!(!outcome.restored);
    }

    #[test]
    fn test_bonus_masks_tier_not_value() {
        let mut state = IntegrityState::<WoundSeverity>::new(100.0);
        state.set_integrity(40.0, 0.0, &table(), |_| {});
        assert_eq!(state.severity(), WoundSeverity::Severe);

        let shift = state.refresh_severity(30.0, &table(), |_| {});
        assert_eq!(shift, Some((WoundSeverity::Severe, WoundSeverity::Moderate)));
        assert_eq!(state.integrity(), 40.0);
    }
}
