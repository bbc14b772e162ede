use std::time::Duration;

#[derive(Copy, Clone, Eq, PartialEq, Debug, Default, serde::Serialize, serde::Deserialize)]
pub enum AnimationCurve {
    #[default]
    EaseInOut,
    EaseIn,
    EaseOut,
    Linear,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AnimationOptions {
    pub curve: AnimationCurve,
    pub allow_user_interaction: bool,
    pub begin_from_current_state: bool,
    pub repeat: bool,
    pub autoreverse: bool,
}

impl From<AnimationCurve> for AnimationOptions {
    fn from(curve: AnimationCurve) -> Self {
        AnimationOptions {
            curve,
            ..Default::default()
        }
    }
}

/// Timing curve modelled on the motion of a physical spring.
#[derive(Copy, Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
pub struct Spring {
    /// `1.0` decelerates without oscillation, values closer to zero oscillate more.
    pub damping: f32,
    /// `1.0` corresponds to the total animation distance traversed in one second.
    pub initial_velocity: f32,
}

/// Parameters forwarded unchanged to the [`Animator`](crate::hal::Animator).
///
/// None of these affect sequencing: a chain waits for the animator to report completion, however
/// long that takes.
#[derive(Copy, Clone, PartialEq, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Animation {
    pub duration: Duration,
    pub delay: Duration,
    pub options: AnimationOptions,
    pub spring: Option<Spring>,
}

impl Animation {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            ..Default::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_options(mut self, options: AnimationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_spring(mut self, damping: f32, initial_velocity: f32) -> Self {
        self.spring = Some(Spring {
            damping,
            initial_velocity,
        });
        self
    }

    /// A zero duration means changes are committed without animating them.
    pub fn is_animated(&self) -> bool {
        !self.duration.is_zero()
    }
}
