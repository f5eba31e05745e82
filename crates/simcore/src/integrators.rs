use serde::{Deserialize, Serialize};

use crate::{Kinematics, SimContext};

/// Acceleration of the output as a function of `(position, velocity)`.
///
/// Evaluating it is allowed to mutate the caller's electrical state (current,
/// bus voltage, slip flag), so it is taken as `FnMut`.
pub type Derivative<'a> = dyn FnMut(f64, f64) -> f64 + 'a;

/// A generic integration strategy trait.
pub trait Integrator {
    /// Advances position and velocity by one timestep.
    ///
    /// `derivative` is only called for intermediate stages. The caller commits
    /// the returned `(position, velocity)` and then evaluates the acceleration
    /// at that committed state, so state that depends on the committed velocity
    /// (a gear selection, say) sees the new step.
    fn advance(&self, ctx: &SimContext, state: Kinematics, derivative: &mut Derivative<'_>) -> (f64, f64);

    /// Advance and evaluate the acceleration at the new state in one go.
    fn step(&self, ctx: &SimContext, state: Kinematics, derivative: &mut Derivative<'_>) -> Kinematics {
        let (position, velocity) = self.advance(ctx, state, derivative);
        Kinematics {
            position,
            velocity,
            acceleration: derivative(position, velocity),
        }
    }
}

/// Heun's method (explicit trapezoidal predictor-corrector).
///
/// Second-order accurate. The derivative is evaluated at the Euler-predicted
/// velocity (old position); together with the acceleration the caller evaluates
/// at the corrected state that makes two evaluations per step.
#[derive(Debug, Clone, Copy, Default)]
pub struct Heun;

impl Integrator for Heun {
    fn advance(&self, ctx: &SimContext, state: Kinematics, derivative: &mut Derivative<'_>) -> (f64, f64) {
        let dt = ctx.dt;

        // Euler predictor
        let v_predicted = state.velocity + state.acceleration * dt;
        let a_predicted = derivative(state.position, v_predicted);

        // Trapezoidal corrector
        let v_corrected = state.velocity + (state.acceleration + a_predicted) / 2.0 * dt;
        let position = state.position + (state.velocity + v_corrected) / 2.0 * dt;

        (position, v_corrected)
    }
}

/// Explicit (forward) Euler integrator.
///
/// First-order accurate. Needs no intermediate stage, only the caller's
/// evaluation at the new state.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardEuler;

impl Integrator for ForwardEuler {
    fn advance(&self, ctx: &SimContext, state: Kinematics, _derivative: &mut Derivative<'_>) -> (f64, f64) {
        let velocity = state.velocity + state.acceleration * ctx.dt;
        let position = state.position + velocity * ctx.dt;
        (position, velocity)
    }
}

/// Integration strategy selectable from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationMethod {
    #[default]
    Heun,
    ForwardEuler,
}

impl Integrator for IntegrationMethod {
    fn advance(&self, ctx: &SimContext, state: Kinematics, derivative: &mut Derivative<'_>) -> (f64, f64) {
        match self {
            IntegrationMethod::Heun => Heun.advance(ctx, state, derivative),
            IntegrationMethod::ForwardEuler => ForwardEuler.advance(ctx, state, derivative),
        }
    }
}
