//! # Lorenz-Dynamics
//!
//! Sensitive Dependence on Initial Conditions: Simulation and Trailing-Window
//! Playback of the Lorenz Attractor
//!
//! ## Theoretical Framework
//!
//! The Lorenz system
//!
//!   dx/dt = σ(y − x)
//!   dy/dt = x(ρ − z) − y
//!   dz/dt = xy − βz
//!
//! is the canonical low-dimensional example of deterministic chaos. For
//! σ = 10, β = 8/3, ρ = 28 almost every trajectory settles onto a strange
//! attractor of dimension ≈ 2.06, and nearby trajectories separate at an
//! average exponential rate λ₁ ≈ 0.906.
//!
//! ### Pipeline
//!
//! 1. **Vector field** ([`systems`]): the Lorenz flow and its Jacobian
//!
//! 2. **Integration** ([`integrate`]): adaptive Dormand-Prince 5(4) with
//!    automatic switching to a Rosenbrock method on stiffness, sampled
//!    exactly on a caller-supplied time grid
//!
//! 3. **Ensembles** ([`trajectory`]): many initial conditions integrated in
//!    parallel, each failure contained to its own entry
//!
//! 4. **Playback** ([`playback`], [`render`]): trailing windows of the
//!    ensemble frame by frame, drawn through a caller-owned render context
//!
//! 5. **Sensitivity** ([`sensitivity`]): pointwise separation of two
//!    trajectories and an estimate of its exponential growth rate
//!
//! ## Key Result
//!
//! Two initial states 1.1 apart, (0, 1, 1) and (0, 2.1, 1), stay close for
//! a few time units and then decorrelate completely:
//!
//!   d(t) ≈ d₀ · e^{λt}   until d reaches the attractor diameter
//!
//! ## References
//!
//! - Lorenz, "Deterministic Nonperiodic Flow", J. Atmos. Sci. 20, 130 (1963)
//! - Hairer, Nørsett & Wanner, "Solving Ordinary Differential Equations I" (1993)
//! - Shampine & Reichelt, "The MATLAB ODE Suite", SIAM J. Sci. Comput. 18 (1997)
//! - Petzold, "Automatic Selection of Methods for Solving Stiff and Nonstiff
//!   Systems of ODEs", SIAM J. Sci. Stat. Comput. 4 (1983)

pub mod config;
pub mod error;
pub mod integrate;
pub mod playback;
pub mod render;
pub mod sensitivity;
pub mod systems;
pub mod trajectory;

// Re-exports from error and config
pub use config::{ConfigError, SimulationConfig};
pub use error::{Result, SimulationError};

// Re-exports from systems
pub use systems::{
    LorenzParams,
    LorenzSystem,
    State,
    VectorField,
};

// Re-exports from integrate
pub use integrate::{
    CancelToken,
    IntegrationFailure,
    IntegrationStats,
    Integrator,
    IntegratorOptions,
    MethodSelection,
    TimeGrid,
    Tolerances,
};

// Re-exports from trajectory
pub use trajectory::{
    Trajectory,
    TrajectoryEntry,
    TrajectoryOutcome,
    TrajectorySet,
};

// Re-exports from playback
pub use playback::{
    Frame,
    TrajectoryWindow,
    WindowedPlaybackBuffer,
    DEFAULT_WINDOW,
};

// Re-exports from sensitivity
pub use sensitivity::{
    compare,
    estimate_exponential_rate,
    DivergenceSeries,
    SeparationRate,
};

// Re-exports from render
pub use render::{
    AsciiRenderer,
    FrameRenderer,
    RenderContext,
};
