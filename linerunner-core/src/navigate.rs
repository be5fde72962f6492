//! Navigation, checkpoint scoring, and beacon handling
//!
//! The navigator turns one line/light reading per tick into a wheel
//! command, drives the checkpoint state machine, latches the two beacon
//! sightings, and escalates through a bounded lost-line search when no
//! detector sees the line.
//!
//! Maneuvers that used to be blocking delays (the full-bar pause, the L2
//! return leg) are tick-counted sub-states here: while one runs it owns the
//! wheel command and sensor handling waits for it to finish.

use crate::checkpoint::Checkpoint;
use crate::config::{LIGHT_THRESHOLD, LOW_SPEED, MEDIUM_SPEED, REVERSE_SPEED};
use crate::effect::{Effect, Effects};
use crate::line::{self, LineCode, Side};
use crate::state::WheelSpeeds;

/// Points for advancing one checkpoint (B through the finish).
const CHECKPOINT_POINTS: u32 = 5;

/// Points for the first L1 beacon sighting.
const L1_POINTS: u32 = 5;

/// Bonus when the A bar is crossed with L1 already latched.
const L1_ACK_BONUS: u32 = 10;

/// Points for completing the L2 return maneuver.
const L2_TASK_POINTS: u32 = 15;

/// Full-bar pause before pulling away (~200 ms).
const BAR_PAUSE_TICKS: u8 = 2;

/// L2 return maneuver: reverse leg (~1 s), then swing leg (~1.5 s).
const L2_REVERSE_TICKS: u8 = 10;
const L2_PIVOT_TICKS: u8 = 15;

/// Asymmetric swing back onto the main track after the L2 reverse leg.
const L2_PIVOT_COMMAND: WheelSpeeds = WheelSpeeds::new(MEDIUM_SPEED, -LOW_SPEED);

// Lost-line escalation tiers, in ticks since the line was last seen.
const LOST_REVERSE_BELOW: u8 = 5;
const LOST_TURN_BELOW: u8 = 15;
const LOST_RESTART_ABOVE: u8 = 25;

/// Spiral search flips direction every this many lost ticks.
const SWEEP_FLIP_INTERVAL: u8 = 5;

/// Multi-tick maneuver that owns the wheel command until it finishes.
#[derive(Debug, Clone, Copy)]
enum Maneuver {
    /// Hold still on the checkpoint stripe, then pull away straight.
    BarPause { ticks_left: u8 },
    /// L2 task: back out of the beacon spur...
    L2Reverse { ticks_left: u8 },
    /// ...then swing back onto the main track.
    L2Pivot { ticks_left: u8 },
}

/// What the navigator wants committed this tick.
#[derive(Debug, Clone, Copy)]
pub struct NavIntent {
    /// Intended wheel command. Only published while recovery is idle.
    pub command: WheelSpeeds,
    /// Points earned this tick.
    pub score_delta: u32,
    /// Whether a beacon currently illuminates the light sensor.
    pub light_detected: bool,
}

/// Navigation and scoring controller.
pub struct Navigator {
    checkpoint: Checkpoint,
    seen_l1: bool,
    seen_l2: bool,
    performed_l2_task: bool,
    light_detected: bool,
    lost_counter: u8,
    last_known_side: Option<Side>,
    sweep_direction: i8,
    maneuver: Option<Maneuver>,
    prev_full_bar: bool,
}

impl Navigator {
    pub const fn new() -> Self {
        Self {
            checkpoint: Checkpoint::Start,
            seen_l1: false,
            seen_l2: false,
            performed_l2_task: false,
            light_detected: false,
            lost_counter: 0,
            last_known_side: None,
            sweep_direction: 1,
            maneuver: None,
            prev_full_bar: false,
        }
    }

    pub fn checkpoint(&self) -> Checkpoint {
        self.checkpoint
    }

    pub fn seen_l1(&self) -> bool {
        self.seen_l1
    }

    pub fn seen_l2(&self) -> bool {
        self.seen_l2
    }

    /// One control tick.
    ///
    /// `obstacle_active` is the recovery controller's verdict from the same
    /// tick; while it is set the navigator still updates its bookkeeping
    /// but must not advance the checkpoint machine, and its command will
    /// not be committed.
    pub fn tick(
        &mut self,
        code: LineCode,
        light_level: u8,
        obstacle_active: bool,
        effects: &mut Effects,
    ) -> NavIntent {
        let mut score_delta = 0;

        if self.checkpoint.is_done() {
            // Parked at the finish. Keep tracking the light edge so the
            // indicator state stays truthful, but never move again.
            let _ = self.check_beacon(light_level, &mut score_delta, effects);
            return self.intent(WheelSpeeds::stop(), score_delta);
        }

        // The full bar is an event, not a lane position: one trigger per
        // rising edge, however long the stripe stays under the detectors.
        let full_bar_event = code.is_full_bar() && !self.prev_full_bar;
        self.prev_full_bar = code.is_full_bar();

        // A running maneuver owns the wheels; sensor handling waits.
        if let Some(command) = self.step_maneuver(&mut score_delta) {
            return self.intent(command, score_delta);
        }

        if !code.is_lost() {
            self.last_known_side = line::side_hint(code);
            self.lost_counter = 0;
        }

        let command = if full_bar_event {
            // Pause on the stripe for a stable reading window.
            self.maneuver = Some(Maneuver::BarPause {
                ticks_left: BAR_PAUSE_TICKS - 1,
            });
            WheelSpeeds::stop()
        } else if code.is_lost() {
            self.lost_line_step()
        } else {
            line::steer(code)
        };

        // Beacon handling may kick off the L2 maneuver, which overrides
        // whatever the line suggested.
        let command = self
            .check_beacon(light_level, &mut score_delta, effects)
            .unwrap_or(command);

        if full_bar_event && !obstacle_active {
            self.advance_checkpoint(&mut score_delta, effects);
        }

        // Crossing the finish bar latches the stop on the same tick.
        let command = if self.checkpoint.is_done() {
            WheelSpeeds::stop()
        } else {
            command
        };

        self.intent(command, score_delta)
    }

    fn intent(&self, command: WheelSpeeds, score_delta: u32) -> NavIntent {
        NavIntent {
            command,
            score_delta,
            light_detected: self.light_detected,
        }
    }

    /// Advance the active maneuver, if any, and return its command.
    fn step_maneuver(&mut self, score_delta: &mut u32) -> Option<WheelSpeeds> {
        let maneuver = self.maneuver?;
        let command = match maneuver {
            Maneuver::BarPause { ticks_left } => {
                if ticks_left > 0 {
                    self.maneuver = Some(Maneuver::BarPause {
                        ticks_left: ticks_left - 1,
                    });
                    WheelSpeeds::stop()
                } else {
                    // Pause over: pull away straight before steering resumes.
                    self.maneuver = None;
                    WheelSpeeds::straight(MEDIUM_SPEED)
                }
            }
            Maneuver::L2Reverse { ticks_left } => {
                if ticks_left > 0 {
                    self.maneuver = Some(Maneuver::L2Reverse {
                        ticks_left: ticks_left - 1,
                    });
                    WheelSpeeds::straight(REVERSE_SPEED)
                } else {
                    self.maneuver = Some(Maneuver::L2Pivot {
                        ticks_left: L2_PIVOT_TICKS - 1,
                    });
                    L2_PIVOT_COMMAND
                }
            }
            Maneuver::L2Pivot { ticks_left } => {
                if ticks_left > 0 {
                    self.maneuver = Some(Maneuver::L2Pivot {
                        ticks_left: ticks_left - 1,
                    });
                    L2_PIVOT_COMMAND
                } else {
                    // Back on the main track: the detour pays out.
                    self.maneuver = None;
                    *score_delta += L2_TASK_POINTS;
                    WheelSpeeds::straight(MEDIUM_SPEED)
                }
            }
        };
        Some(command)
    }

    /// Lost-line escalation: reverse (overshoot assumption), then turn
    /// toward the last hint or spiral, then creep forward, then start over.
    /// Bounded retry; the search never gives up.
    fn lost_line_step(&mut self) -> WheelSpeeds {
        self.lost_counter += 1;

        if self.lost_counter < LOST_REVERSE_BELOW {
            WheelSpeeds::straight(REVERSE_SPEED)
        } else if self.lost_counter < LOST_TURN_BELOW {
            match self.last_known_side {
                Some(Side::Right) => WheelSpeeds::pivot(LOW_SPEED),
                Some(Side::Left) => WheelSpeeds::pivot(-LOW_SPEED),
                None => {
                    let command = WheelSpeeds::pivot(self.sweep_direction * MEDIUM_SPEED);
                    if self.lost_counter % SWEEP_FLIP_INTERVAL == 0 {
                        self.sweep_direction = -self.sweep_direction;
                    }
                    command
                }
            }
        } else {
            if self.lost_counter > LOST_RESTART_ABOVE {
                self.lost_counter = 0;
            }
            WheelSpeeds::straight(LOW_SPEED)
        }
    }

    /// Beacon detection and scoring. Returns a command override when the
    /// L2 maneuver starts on this tick.
    fn check_beacon(
        &mut self,
        light_level: u8,
        score_delta: &mut u32,
        effects: &mut Effects,
    ) -> Option<WheelSpeeds> {
        if light_level <= LIGHT_THRESHOLD {
            if self.light_detected {
                self.light_detected = false;
                effects.push(Effect::IndicatorOff);
            }
            return None;
        }

        if !self.light_detected {
            self.light_detected = true;
            effects.push(Effect::IndicatorOn);
        }

        if self.checkpoint < Checkpoint::C && !self.seen_l1 {
            // First beacon. Latches for the rest of the mission; repeated
            // crossings score nothing.
            self.seen_l1 = true;
            *score_delta += L1_POINTS;
            effects.push(Effect::Blink(2));
        } else if self.checkpoint >= Checkpoint::C && !self.seen_l2 {
            self.seen_l2 = true;
            if self.checkpoint == Checkpoint::D && !self.performed_l2_task {
                // One-shot return maneuver out of the beacon spur.
                self.performed_l2_task = true;
                effects.push(Effect::Honk);
                effects.push(Effect::Honk);
                self.maneuver = Some(Maneuver::L2Reverse {
                    ticks_left: L2_REVERSE_TICKS - 1,
                });
                return Some(WheelSpeeds::straight(REVERSE_SPEED));
            }
        }

        None
    }

    /// Advance one marker and award points. Called on a full-bar event
    /// while recovery is idle.
    fn advance_checkpoint(&mut self, score_delta: &mut u32, effects: &mut Effects) {
        let from = self.checkpoint;
        self.checkpoint = from.next();

        match from {
            // Crossing the start line opens the mission; no points yet.
            Checkpoint::Start => {}
            Checkpoint::A => {
                *score_delta += CHECKPOINT_POINTS;
                if self.seen_l1 {
                    *score_delta += L1_ACK_BONUS;
                    effects.push(Effect::Blink(3));
                }
            }
            Checkpoint::F => {
                *score_delta += CHECKPOINT_POINTS;
                // Stays lit at the finish.
                effects.push(Effect::IndicatorOn);
            }
            Checkpoint::B | Checkpoint::C | Checkpoint::D | Checkpoint::E => {
                *score_delta += CHECKPOINT_POINTS;
                effects.push(Effect::IndicatorToggle);
            }
            // Unreachable: Done never re-enters the tick body.
            Checkpoint::Done => {}
        }
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Tick with no obstacle and a dark light sensor.
    fn nav_tick(nav: &mut Navigator, code: u8) -> NavIntent {
        let mut fx = Effects::new();
        nav.tick(LineCode::new(code), 0, false, &mut fx)
    }

    fn nav_tick_fx(nav: &mut Navigator, code: u8, light: u8) -> (NavIntent, Effects) {
        let mut fx = Effects::new();
        let intent = nav.tick(LineCode::new(code), light, false, &mut fx);
        (intent, fx)
    }

    #[test]
    fn scenario_start_line_pause_and_no_points() {
        let mut nav = Navigator::new();

        assert_eq!(nav_tick(&mut nav, 2).command, WheelSpeeds::straight(MEDIUM_SPEED));
        assert_eq!(nav_tick(&mut nav, 2).command, WheelSpeeds::straight(MEDIUM_SPEED));

        // Full bar: brief stop, checkpoint advances, nothing scored yet.
        let intent = nav_tick(&mut nav, 7);
        assert_eq!(intent.command, WheelSpeeds::stop());
        assert_eq!(intent.score_delta, 0);
        assert_eq!(nav.checkpoint(), Checkpoint::A);

        // Second pause tick, then pull away straight.
        assert_eq!(nav_tick(&mut nav, 2).command, WheelSpeeds::stop());
        assert_eq!(nav_tick(&mut nav, 2).command, WheelSpeeds::straight(MEDIUM_SPEED));
    }

    #[test]
    fn full_bar_is_one_event_per_stripe() {
        let mut nav = Navigator::new();

        // The stripe stays under the detectors for several ticks while the
        // vehicle pauses on it; only one advance may result.
        for _ in 0..5 {
            nav_tick(&mut nav, 7);
        }
        assert_eq!(nav.checkpoint(), Checkpoint::A);
    }

    #[test]
    fn advance_past_a_with_l1_awards_bonus() {
        let mut nav = Navigator::new();
        nav.checkpoint = Checkpoint::A;
        nav.seen_l1 = true;

        let (intent, fx) = nav_tick_fx(&mut nav, 7, 0);
        assert_eq!(intent.score_delta, CHECKPOINT_POINTS + L1_ACK_BONUS);
        assert!(fx.contains(&Effect::Blink(3)));
        assert_eq!(nav.checkpoint(), Checkpoint::B);
    }

    #[test]
    fn advance_past_a_without_l1_is_plain() {
        let mut nav = Navigator::new();
        nav.checkpoint = Checkpoint::A;

        let (intent, fx) = nav_tick_fx(&mut nav, 7, 0);
        assert_eq!(intent.score_delta, CHECKPOINT_POINTS);
        assert!(!fx.contains(&Effect::Blink(3)));
    }

    #[test]
    fn scenario_l1_at_b_then_bar_scores_ten_total() {
        let mut nav = Navigator::new();
        nav.checkpoint = Checkpoint::B;

        // Beacon crossing while at B: L1 latches, +5.
        let (intent, fx) = nav_tick_fx(&mut nav, 2, 90);
        assert_eq!(intent.score_delta, L1_POINTS);
        assert!(intent.light_detected);
        assert!(nav.seen_l1());
        assert!(fx.contains(&Effect::Blink(2)));
        assert!(fx.contains(&Effect::IndicatorOn));

        // Bar at B: +5 for reaching C, and no retroactive A bonus.
        let (intent, fx) = nav_tick_fx(&mut nav, 7, 0);
        assert_eq!(intent.score_delta, CHECKPOINT_POINTS);
        assert!(!fx.contains(&Effect::Blink(3)));
        assert_eq!(nav.checkpoint(), Checkpoint::C);
        // Light gone: indicator released.
        assert!(fx.contains(&Effect::IndicatorOff));
    }

    #[test]
    fn repeated_l1_crossings_score_once() {
        let mut nav = Navigator::new();

        assert_eq!(nav_tick_fx(&mut nav, 2, 90).0.score_delta, L1_POINTS);
        nav_tick_fx(&mut nav, 2, 0); // beacon passes
        let (intent, fx) = nav_tick_fx(&mut nav, 2, 90);
        assert_eq!(intent.score_delta, 0);
        assert!(!fx.contains(&Effect::Blink(2)));
    }

    #[test]
    fn scenario_l2_task_at_d() {
        let mut nav = Navigator::new();
        nav.checkpoint = Checkpoint::D;

        // Beacon at D: latch, double honk, reverse leg begins.
        let (intent, fx) = nav_tick_fx(&mut nav, 2, 90);
        assert_eq!(intent.command, WheelSpeeds::straight(REVERSE_SPEED));
        assert_eq!(intent.score_delta, 0);
        assert!(nav.seen_l2());
        assert_eq!(fx.iter().filter(|&&e| e == Effect::Honk).count(), 2);

        // Reverse for ~1s total.
        for _ in 0..L2_REVERSE_TICKS - 1 {
            assert_eq!(nav_tick(&mut nav, 2).command, WheelSpeeds::straight(REVERSE_SPEED));
        }
        // Swing back for ~1.5s.
        for _ in 0..L2_PIVOT_TICKS {
            assert_eq!(nav_tick(&mut nav, 2).command, L2_PIVOT_COMMAND);
        }
        // Maneuver completes: +15, straight ahead.
        let intent = nav_tick(&mut nav, 2);
        assert_eq!(intent.score_delta, L2_TASK_POINTS);
        assert_eq!(intent.command, WheelSpeeds::straight(MEDIUM_SPEED));

        // A second crossing at D has no further effect.
        let (intent, fx) = nav_tick_fx(&mut nav, 2, 90);
        assert_eq!(intent.score_delta, 0);
        assert!(fx.iter().all(|&e| e != Effect::Honk));
        assert_eq!(intent.command, WheelSpeeds::straight(MEDIUM_SPEED));
    }

    #[test]
    fn l2_beyond_d_latches_without_maneuver() {
        let mut nav = Navigator::new();
        nav.checkpoint = Checkpoint::E;

        let (intent, fx) = nav_tick_fx(&mut nav, 2, 90);
        assert!(nav.seen_l2());
        assert_eq!(intent.score_delta, 0);
        assert!(fx.iter().all(|&e| e != Effect::Honk));
        // Steering unaffected.
        assert_eq!(intent.command, WheelSpeeds::straight(MEDIUM_SPEED));
    }

    #[test]
    fn no_checkpoint_advance_while_obstacle_active() {
        let mut nav = Navigator::new();
        let mut fx = Effects::new();

        let intent = nav.tick(LineCode::FULL_BAR, 0, true, &mut fx);
        assert_eq!(nav.checkpoint(), Checkpoint::Start);
        assert_eq!(intent.score_delta, 0);
        // The pause still runs internally; the command just won't be
        // committed while recovery owns the vehicle.
        assert_eq!(intent.command, WheelSpeeds::stop());
    }

    #[test]
    fn finish_bar_parks_the_vehicle_for_good() {
        let mut nav = Navigator::new();
        nav.checkpoint = Checkpoint::F;

        let (intent, fx) = nav_tick_fx(&mut nav, 7, 0);
        assert_eq!(nav.checkpoint(), Checkpoint::Done);
        assert_eq!(intent.score_delta, CHECKPOINT_POINTS);
        assert_eq!(intent.command, WheelSpeeds::stop());
        assert!(fx.contains(&Effect::IndicatorOn));

        // Whatever the sensors say afterwards, the vehicle stays parked.
        for code in [0, 1, 2, 5, 7] {
            assert_eq!(nav_tick(&mut nav, code).command, WheelSpeeds::stop());
        }
        assert_eq!(nav.checkpoint(), Checkpoint::Done);
    }

    #[test]
    fn lost_line_reverses_first() {
        let mut nav = Navigator::new();
        nav_tick(&mut nav, 2);

        for _ in 0..4 {
            assert_eq!(nav_tick(&mut nav, 0).command, WheelSpeeds::straight(REVERSE_SPEED));
        }
    }

    #[test]
    fn lost_line_turns_toward_last_seen_side() {
        let mut nav = Navigator::new();

        // Line last seen right of center.
        nav_tick(&mut nav, 1);
        nav.lost_counter = 7;
        assert_eq!(nav_tick(&mut nav, 0).command, WheelSpeeds::pivot(LOW_SPEED));

        // Line last seen left of center.
        nav_tick(&mut nav, 6);
        nav.lost_counter = 7;
        assert_eq!(nav_tick(&mut nav, 0).command, WheelSpeeds::pivot(-LOW_SPEED));
    }

    #[test]
    fn lost_line_spirals_without_a_hint() {
        let mut nav = Navigator::new();

        // Last reading was the centered code, which gives no side hint.
        nav_tick(&mut nav, 2);
        nav.lost_counter = 7;
        let command = nav_tick(&mut nav, 0).command;
        assert_eq!(command, WheelSpeeds::pivot(nav.sweep_direction * MEDIUM_SPEED));

        // The sweep flips every few ticks so the search widens both ways.
        nav.lost_counter = SWEEP_FLIP_INTERVAL * 2 - 1;
        let before = nav.sweep_direction;
        nav_tick(&mut nav, 0);
        assert_eq!(nav.sweep_direction, -before);
    }

    #[test]
    fn lost_line_creeps_then_restarts() {
        let mut nav = Navigator::new();
        nav_tick(&mut nav, 2);

        nav.lost_counter = 20;
        assert_eq!(nav_tick(&mut nav, 0).command, WheelSpeeds::straight(LOW_SPEED));

        // Past the ceiling the counter resets and escalation starts over.
        nav.lost_counter = 30;
        nav_tick(&mut nav, 0);
        assert_eq!(nav.lost_counter, 0);
        assert_eq!(nav_tick(&mut nav, 0).command, WheelSpeeds::straight(REVERSE_SPEED));
    }

    #[test]
    fn finding_the_line_resets_the_search() {
        let mut nav = Navigator::new();

        nav.lost_counter = 12;
        nav_tick(&mut nav, 3);
        assert_eq!(nav.lost_counter, 0);
        assert_eq!(nav.last_known_side, Some(Side::Right));
    }

    proptest! {
        /// The beacon latches transition false to true at most once per
        /// mission and never release, whatever the sensors report.
        #[test]
        fn beacon_latches_never_release(
            ticks in proptest::collection::vec((0u8..8, 0u8..=100u8), 0..300),
        ) {
            let mut nav = Navigator::new();
            let mut latched = (false, false);
            for (code, light) in ticks {
                let mut fx = Effects::new();
                nav.tick(LineCode::new(code), light, false, &mut fx);
                if latched.0 {
                    prop_assert!(nav.seen_l1());
                }
                if latched.1 {
                    prop_assert!(nav.seen_l2());
                }
                latched = (nav.seen_l1(), nav.seen_l2());
            }
        }
    }
}
