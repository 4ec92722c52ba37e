//! Health reporting for long-lived components such as store clients and
//! sessions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The health of a single component.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComponentHealth {
  /// The component has nothing that could fail, e.g. an in-process mock.
  IntrinsicallyUp,
  /// The component is up.
  Up,
  /// The component is up but impaired.
  Degraded(String),
  /// The component is down.
  Down(String),
}

impl ComponentHealth {
  /// Whether the component can currently serve requests.
  pub fn is_available(&self) -> bool {
    matches!(
      self,
      ComponentHealth::IntrinsicallyUp
        | ComponentHealth::Up
        | ComponentHealth::Degraded(_)
    )
  }
}

impl fmt::Display for ComponentHealth {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ComponentHealth::IntrinsicallyUp => write!(f, "up (intrinsic)"),
      ComponentHealth::Up => write!(f, "up"),
      ComponentHealth::Degraded(reason) => write!(f, "degraded: {reason}"),
      ComponentHealth::Down(reason) => write!(f, "down: {reason}"),
    }
  }
}

/// A component that can report its own health.
#[async_trait::async_trait]
pub trait HealthReporter: Send + Sync + 'static {
  /// The name of the component.
  fn name(&self) -> &'static str;
  /// Checks the component's health.
  async fn health_check(&self) -> ComponentHealth;
}

/// Runs the health checks of all given components concurrently.
pub async fn check_all(
  reporters: &[&dyn HealthReporter],
) -> Vec<(&'static str, ComponentHealth)> {
  let checks = reporters.iter().map(|r| async move {
    let health = r.health_check().await;
    (r.name(), health)
  });
  futures::future::join_all(checks).await
}
