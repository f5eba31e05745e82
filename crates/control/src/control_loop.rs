//! Goal-seeking controllers that turn measured mechanism state into a
//! voltage command.

use serde::{Deserialize, Serialize};
use simcore::Model;

/// Where a controller stands relative to its goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlPhase {
    /// Constructed, no update seen yet
    #[default]
    Idle,
    Seeking,
    OnGoal,
}

/// Controller diagnostics carried in each logged data point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControllerSnapshot {
    pub goal: f64,
    pub error: f64,
    pub on_goal: bool,
}

/// Measurements handed to a controller variant on every update, plus the
/// error bookkeeping already done by [`ControllerCore`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Feedback {
    pub position: f64,
    pub velocity: f64,
    pub acceleration: f64,
    /// Branch voltage currently available to each motor (V)
    pub voltage: f64,
    /// Current drawn by each motor (A)
    pub current: f64,
    /// `goal - position` for this update
    pub error: f64,
    /// Error from the previous update (0 after construction or reset)
    pub previous_error: f64,
    pub goal: f64,
}

/// Goal, deadband and error tracking shared by every controller.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ControllerCore {
    goal: f64,
    deadband: f64,
    last_error: f64,
    phase: ControlPhase,
}

impl ControllerCore {
    pub fn new(goal: f64, deadband: f64) -> Self {
        ControllerCore {
            goal,
            deadband,
            ..Default::default()
        }
    }

    pub fn goal(&self) -> f64 {
        self.goal
    }

    pub fn set_goal(&mut self, goal: f64) {
        self.goal = goal;
    }

    pub fn deadband(&self) -> f64 {
        self.deadband
    }

    pub fn set_deadband(&mut self, deadband: f64) {
        self.deadband = deadband;
    }

    pub fn last_error(&self) -> f64 {
        self.last_error
    }

    pub fn phase(&self) -> ControlPhase {
        self.phase
    }

    /// Record a new position; returns the new error.
    pub fn observe(&mut self, position: f64) -> f64 {
        let error = self.goal - position;
        self.last_error = error;
        self.phase = if error.abs() < self.deadband {
            ControlPhase::OnGoal
        } else {
            ControlPhase::Seeking
        };
        error
    }
}

impl Model for ControllerCore {
    fn reset(&mut self) {
        self.last_error = 0.0;
        self.phase = ControlPhase::Seeking;
    }
}

/// A controller driving a mechanism toward a goal position.
///
/// Variants supply [`ControlLoop::command`]; goal handling, the on-goal state
/// machine and diagnostics come from the shared [`ControllerCore`].
pub trait ControlLoop: Model + std::fmt::Debug {
    fn core(&self) -> &ControllerCore;

    fn core_mut(&mut self) -> &mut ControllerCore;

    /// Voltage command for one update.
    fn command(&mut self, feedback: &Feedback) -> f64;

    fn set_goal(&mut self, goal: f64) {
        self.core_mut().set_goal(goal);
    }

    fn goal(&self) -> f64 {
        self.core().goal()
    }

    fn set_deadband(&mut self, deadband: f64) {
        self.core_mut().set_deadband(deadband);
    }

    fn update(
        &mut self,
        position: f64,
        velocity: f64,
        acceleration: f64,
        voltage: f64,
        current: f64,
    ) -> f64 {
        let previous_error = self.core().last_error();
        let error = self.core_mut().observe(position);
        let feedback = Feedback {
            position,
            velocity,
            acceleration,
            voltage,
            current,
            error,
            previous_error,
            goal: self.core().goal(),
        };
        self.command(&feedback)
    }

    fn is_done(&self) -> bool {
        self.core().phase() == ControlPhase::OnGoal
    }

    fn get_error(&self) -> f64 {
        self.core().last_error()
    }

    fn phase(&self) -> ControlPhase {
        self.core().phase()
    }

    fn snapshot(&self) -> ControllerSnapshot {
        let core = self.core();
        ControllerSnapshot {
            goal: core.goal(),
            error: core.last_error(),
            on_goal: core.phase() == ControlPhase::OnGoal,
        }
    }
}
