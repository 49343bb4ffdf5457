use crate::agent::Controller;
use crate::domain::{Domain, DomainError};
use crate::render::Renderer;
use slog::{Logger, Record, Serializer, KV};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The pole fell or the cart left the track.
    PoleFell,
    MaxSteps,
    RendererClosed,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct EpisodeResult {
    pub steps: u64,
    pub total_reward: f64,
    pub outcome: Outcome,
}

impl KV for EpisodeResult {
    fn serialize(&self, _: &Record, serializer: &mut dyn Serializer) -> slog::Result {
        serializer.emit_u64("steps", self.steps)?;
        serializer.emit_f64("reward", self.total_reward)?;
        serializer.emit_arguments("outcome", &format_args!("{:?}", self.outcome))
    }
}

/// Runs one episode of at most `max_steps` steps.
pub fn run_episode<C, D, R>(
    controller: &mut C,
    domain: &mut D,
    renderer: &mut R,
    max_steps: u64,
    logger: &Logger,
) -> Result<EpisodeResult, DomainError>
where
    C: Controller + ?Sized,
    D: Domain + ?Sized,
    R: Renderer + ?Sized,
{
    let mut state = *domain.emit().state();
    let mut total_reward = 0.0;
    let mut steps = 0;

    while steps < max_steps {
        if renderer.is_closed() {
            info!(logger, "display closed, ending episode"; "step" => steps);
            return Ok(EpisodeResult {
                steps,
                total_reward,
                outcome: Outcome::RendererClosed,
            });
        }

        let action = controller.act(&state);
        let transition = domain.step(action)?;
        controller.update(&transition);
        steps += 1;
        total_reward += transition.reward;
        state = *transition.to.state();
        trace!(logger, "step";
            "step" => steps,
            "action" => action.index(),
            "theta" => state.theta,
            "theta_dot" => state.theta_dot);

        renderer.render(&state);

        if transition.done() {
            info!(logger, "pole fell or cart left the track"; "step" => steps);
            return Ok(EpisodeResult {
                steps,
                total_reward,
                outcome: Outcome::PoleFell,
            });
        }
    }

    Ok(EpisodeResult {
        steps,
        total_reward,
        outcome: Outcome::MaxSteps,
    })
}

/// Runs `episodes` episodes, each on a fresh domain from `domain_builder`.
/// The controller persists and is `reset` between episodes. Stops early if
/// the renderer closes.
pub fn run<C, D, F, R>(
    controller: &mut C,
    mut domain_builder: F,
    renderer: &mut R,
    episodes: u64,
    max_steps: u64,
    logger: &Logger,
) -> Result<Vec<EpisodeResult>, DomainError>
where
    C: Controller + ?Sized,
    D: Domain,
    F: FnMut(u64) -> D,
    R: Renderer + ?Sized,
{
    let mut results = Vec::new();
    for episode in 0..episodes {
        if episode > 0 {
            controller.reset();
        }
        let logger = logger.new(o!("episode" => episode));
        let mut domain = domain_builder(episode);
        let result = run_episode(controller, &mut domain, renderer, max_steps, &logger)?;
        info!(logger, "episode finished"; result);
        results.push(result);
        if result.outcome == Outcome::RendererClosed {
            break;
        }
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::ZoneBalanceController;
    use crate::config::ControllerConfig;
    use crate::domain::{CartPole, Observation, Transition};
    use crate::logging;
    use crate::render::Headless;
    use cartpole_codec::{Action, State};
    use std::time::Duration;

    /// Scripted domain: terminal after `length` steps.
    struct Scripted {
        t: u64,
        length: u64,
    }
    impl Domain for Scripted {
        fn emit(&self) -> Observation<State> {
            let s = State::new(self.t as f64, 0.0, 0.0, 0.0);
            if self.t >= self.length {
                Observation::Terminal(s)
            } else {
                Observation::Full(s)
            }
        }

        fn step(&mut self, action: Action) -> Result<Transition, DomainError> {
            let from = self.emit();
            self.t += 1;
            Ok(Transition {
                from,
                action,
                reward: 1.0,
                to: self.emit(),
            })
        }
    }

    #[derive(Default)]
    struct Counting {
        acts: u64,
        updates: u64,
        resets: u64,
    }
    impl Controller for Counting {
        fn act(&mut self, _state: &State) -> Action {
            self.acts += 1;
            Action::Left
        }

        fn update(&mut self, _transition: &Transition) { self.updates += 1; }

        fn reset(&mut self) { self.resets += 1; }
    }

    /// Closes after drawing `frames` frames.
    struct ClosesAfter {
        frames: u64,
    }
    impl Renderer for ClosesAfter {
        fn render(&mut self, _state: &State) { self.frames = self.frames.saturating_sub(1); }

        fn is_closed(&self) -> bool { self.frames == 0 }
    }

    #[test]
    fn stops_on_terminal_transition() {
        let mut c = Counting::default();
        let mut d = Scripted { t: 0, length: 3 };
        let r = run_episode(&mut c, &mut d, &mut Headless, 10, &logging::discard()).unwrap();
        assert_eq!(r, EpisodeResult {
            steps: 3,
            total_reward: 3.0,
            outcome: Outcome::PoleFell
        });
        assert_eq!((c.acts, c.updates), (3, 3));
    }

    #[test]
    fn stops_at_step_limit() {
        let mut c = Counting::default();
        let mut d = Scripted { t: 0, length: 100 };
        let r = run_episode(&mut c, &mut d, &mut Headless, 10, &logging::discard()).unwrap();
        assert_eq!(r.steps, 10);
        assert_eq!(r.outcome, Outcome::MaxSteps);
    }

    #[test]
    fn closed_renderer_ends_run() {
        let mut c = Counting::default();
        let mut r = ClosesAfter { frames: 4 };
        let results = run(
            &mut c,
            |_| Scripted { t: 0, length: 100 },
            &mut r,
            3,
            50,
            &logging::discard(),
        )
        .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].steps, 4);
        assert_eq!(results[0].outcome, Outcome::RendererClosed);
    }

    #[test]
    fn resets_between_episodes() {
        let mut c = Counting::default();
        let results = run(
            &mut c,
            |_| Scripted { t: 0, length: 2 },
            &mut Headless,
            3,
            50,
            &logging::discard(),
        )
        .unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(c.resets, 2);
        assert_eq!(c.acts, 6);
    }

    #[test]
    fn zone_controller_outlasts_a_constant_push() {
        let logger = logging::discard();
        let config = ControllerConfig::default();
        let mut zone = ZoneBalanceController::new(&config, Some(42)).unwrap();
        let mut d = CartPole::new(Some(42), Duration::from_millis(0), &logger);
        let balanced = run_episode(&mut zone, &mut d, &mut Headless, 200, &logger).unwrap();

        let mut pusher = Counting::default();
        let mut d = CartPole::new(Some(42), Duration::from_millis(0), &logger);
        let pushed = run_episode(&mut pusher, &mut d, &mut Headless, 200, &logger).unwrap();

        assert_eq!(pushed.outcome, Outcome::PoleFell);
        assert!(balanced.steps > pushed.steps);
        assert_eq!(zone.history().len(), 5);
    }

    #[test]
    fn result_serializes_for_reports() {
        let r = EpisodeResult {
            steps: 7,
            total_reward: 7.0,
            outcome: Outcome::MaxSteps,
        };
        let json = serde_json::to_string(&r).unwrap();
        assert!(json.contains("\"outcome\":\"max_steps\""));
    }
}
