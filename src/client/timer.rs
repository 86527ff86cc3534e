use std::time::Instant;

use crate::{dto::game::GameSnapshotResponse, state::phase::RoundPhase};

/// Remaining-seconds marks that trigger one-shot local feedback effects.
pub const ALERT_THRESHOLDS_SECS: [u64; 4] = [120, 60, 30, 0];

#[derive(Debug, Clone, Copy)]
struct Anchor {
    remaining_secs: f64,
    synced_at: Instant,
}

/// Client-side countdown reconciled against the server's authoritative
/// elapsed-time anchor.
///
/// On each poll the snapshot's `elapsed_seconds` (computed server-side at
/// response time) re-anchors the countdown; between polls the display ticks
/// by extrapolating with the client's own monotonic clock, never by
/// re-polling. The next poll overwrites the anchor, correcting drift and
/// phase changes made by other clients. Threshold crossings fire exactly once
/// per round: the per-threshold flags survive re-renders and reset only when
/// the round or phase changes.
#[derive(Debug, Default)]
pub struct CountdownTimer {
    anchor: Option<Anchor>,
    key: Option<(u32, RoundPhase)>,
    fired: [bool; ALERT_THRESHOLDS_SECS.len()],
}

impl CountdownTimer {
    /// Timer with no anchor; shows zero until the first discussion poll.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one poll response into the timer at local instant `now`.
    ///
    /// Only the discussion phase carries a countdown; any other phase drops
    /// the anchor. Thresholds already in the past when a discussion is first
    /// observed (late join, short durations) are marked as fired so they
    /// never produce stale alerts.
    pub fn observe(&mut self, snapshot: &GameSnapshotResponse, now: Instant) {
        let Some(round) = snapshot.round.as_ref() else {
            self.reset();
            return;
        };

        let key = (round.round_number, round.phase);
        let key_changed = self.key != Some(key);
        if key_changed {
            self.key = Some(key);
            self.fired = [false; ALERT_THRESHOLDS_SECS.len()];
        }

        if round.phase != RoundPhase::Discussion {
            self.anchor = None;
            return;
        }

        let duration = f64::from(snapshot.lobby.round_duration_seconds);
        let remaining = (duration - round.elapsed_seconds).max(0.0);

        if key_changed {
            for (index, threshold) in ALERT_THRESHOLDS_SECS.iter().enumerate() {
                if (*threshold as f64) > remaining {
                    self.fired[index] = true;
                }
            }
        }

        self.anchor = Some(Anchor {
            remaining_secs: remaining,
            synced_at: now,
        });
    }

    /// Whole seconds left at local instant `now`, extrapolated from the last
    /// anchor. Zero when no discussion countdown is active.
    pub fn remaining_at(&self, now: Instant) -> u64 {
        match &self.anchor {
            Some(anchor) => {
                let local = now.saturating_duration_since(anchor.synced_at).as_secs_f64();
                (anchor.remaining_secs - local).max(0.0).floor() as u64
            }
            None => 0,
        }
    }

    /// Thresholds newly crossed at `now`, each reported at most once per
    /// round. Call from the local display tick (e.g. every 100ms).
    pub fn take_due_alerts(&mut self, now: Instant) -> Vec<u64> {
        if self.anchor.is_none() {
            return Vec::new();
        }
        let remaining = self.remaining_at(now);
        let mut due = Vec::new();
        for (index, threshold) in ALERT_THRESHOLDS_SECS.iter().enumerate() {
            if remaining <= *threshold && !self.fired[index] {
                self.fired[index] = true;
                due.push(*threshold);
            }
        }
        due
    }

    /// Whether a discussion countdown is currently anchored.
    pub fn is_counting(&self) -> bool {
        self.anchor.is_some()
    }

    fn reset(&mut self) {
        self.anchor = None;
        self.key = None;
        self.fired = [false; ALERT_THRESHOLDS_SECS.len()];
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{
        dao::models::LobbyStatus,
        dto::game::{LobbySummary, RoundSummary},
    };

    fn snapshot(
        round_number: u32,
        phase: RoundPhase,
        elapsed_seconds: f64,
        duration: u32,
    ) -> GameSnapshotResponse {
        GameSnapshotResponse {
            lobby: LobbySummary {
                code: "TIMERS".into(),
                host_player_id: "p-host".into(),
                status: LobbyStatus::Playing,
                category: Some("animals".into()),
                round_duration_seconds: duration,
                total_rounds: 3,
                current_round: round_number,
            },
            round: Some(RoundSummary {
                round_number,
                phase,
                category: "animals".into(),
                word: "giraffe".into(),
                imposter_id: "p-host".into(),
                elapsed_seconds,
                started_at: "2026-01-01T00:00:00Z".into(),
                ended_at: None,
            }),
            players: Vec::new(),
            eliminated_ids: Vec::new(),
            votes: Vec::new(),
            scores: Vec::new(),
        }
    }

    #[test]
    fn extrapolates_between_polls_with_the_local_clock() {
        let t0 = Instant::now();
        let mut timer = CountdownTimer::new();
        timer.observe(&snapshot(1, RoundPhase::Discussion, 10.0, 300), t0);

        assert_eq!(timer.remaining_at(t0), 290);
        assert_eq!(timer.remaining_at(t0 + Duration::from_secs(5)), 285);
        assert_eq!(timer.remaining_at(t0 + Duration::from_millis(5500)), 284);
    }

    #[test]
    fn the_next_poll_overwrites_the_anchor() {
        let t0 = Instant::now();
        let mut timer = CountdownTimer::new();
        timer.observe(&snapshot(1, RoundPhase::Discussion, 10.0, 300), t0);

        // local clock drifted: extrapolation says 285, server says 280
        let t1 = t0 + Duration::from_secs(5);
        timer.observe(&snapshot(1, RoundPhase::Discussion, 20.0, 300), t1);
        assert_eq!(timer.remaining_at(t1), 280);
    }

    #[test]
    fn countdown_never_goes_negative() {
        let t0 = Instant::now();
        let mut timer = CountdownTimer::new();
        timer.observe(&snapshot(1, RoundPhase::Discussion, 295.0, 300), t0);

        assert_eq!(timer.remaining_at(t0 + Duration::from_secs(60)), 0);
    }

    #[test]
    fn only_discussion_counts_down() {
        let t0 = Instant::now();
        let mut timer = CountdownTimer::new();

        for phase in [RoundPhase::WordReveal, RoundPhase::Voting, RoundPhase::Results] {
            timer.observe(&snapshot(1, phase, 10.0, 300), t0);
            assert!(!timer.is_counting());
            assert_eq!(timer.remaining_at(t0), 0);
            assert!(timer.take_due_alerts(t0).is_empty());
        }
    }

    #[test]
    fn thresholds_fire_once_per_round() {
        let t0 = Instant::now();
        let mut timer = CountdownTimer::new();
        timer.observe(&snapshot(1, RoundPhase::Discussion, 170.0, 300), t0);

        // remaining 130: nothing due yet
        assert!(timer.take_due_alerts(t0).is_empty());

        // crossing 120 fires exactly once, surviving re-render-style repeats
        let t1 = t0 + Duration::from_secs(11);
        assert_eq!(timer.take_due_alerts(t1), vec![120]);
        assert!(timer.take_due_alerts(t1).is_empty());
        assert!(timer.take_due_alerts(t1 + Duration::from_millis(100)).is_empty());
    }

    #[test]
    fn resync_does_not_refire_past_thresholds() {
        let t0 = Instant::now();
        let mut timer = CountdownTimer::new();
        timer.observe(&snapshot(1, RoundPhase::Discussion, 170.0, 300), t0);
        let t1 = t0 + Duration::from_secs(11);
        assert_eq!(timer.take_due_alerts(t1), vec![120]);

        // server correction jumps remaining back above the threshold
        timer.observe(&snapshot(1, RoundPhase::Discussion, 165.0, 300), t1);
        assert!(timer.take_due_alerts(t1).is_empty());
    }

    #[test]
    fn a_new_round_resets_the_flags() {
        let t0 = Instant::now();
        let mut timer = CountdownTimer::new();
        timer.observe(&snapshot(1, RoundPhase::Discussion, 170.0, 300), t0);
        let t1 = t0 + Duration::from_secs(11);
        assert_eq!(timer.take_due_alerts(t1), vec![120]);

        // next round's discussion starts a fresh alert cycle
        timer.observe(&snapshot(2, RoundPhase::Discussion, 175.0, 300), t1);
        let t2 = t1 + Duration::from_secs(6);
        assert_eq!(timer.take_due_alerts(t2), vec![120]);
    }

    #[test]
    fn late_joiners_skip_stale_alerts() {
        let t0 = Instant::now();
        let mut timer = CountdownTimer::new();
        // first observation with 50s left: 120 and 60 are already history
        timer.observe(&snapshot(1, RoundPhase::Discussion, 250.0, 300), t0);

        assert!(timer.take_due_alerts(t0).is_empty());
        let t1 = t0 + Duration::from_secs(21);
        assert_eq!(timer.take_due_alerts(t1), vec![30]);
        let t2 = t0 + Duration::from_secs(51);
        assert_eq!(timer.take_due_alerts(t2), vec![0]);
    }

    #[test]
    fn waiting_lobby_clears_the_timer() {
        let t0 = Instant::now();
        let mut timer = CountdownTimer::new();
        timer.observe(&snapshot(1, RoundPhase::Discussion, 10.0, 300), t0);
        assert!(timer.is_counting());

        let mut waiting = snapshot(1, RoundPhase::Discussion, 10.0, 300);
        waiting.round = None;
        timer.observe(&waiting, t0);
        assert!(!timer.is_counting());
        assert_eq!(timer.remaining_at(t0), 0);
    }
}
