use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::config::DemoConfig;
use crate::demo::{MatchEvent, PlayerId};

const NAMES: [&str; 12] = [
    "Ada", "Bjarne", "Grace", "Linus", "Margaret", "Dennis", "Barbara", "Ken", "Radia", "Guido",
    "Frances", "Niklaus",
];

/// Ticks between round announcements
const ROUND_TICKS: u32 = 25;

/// Deterministic match driver: one call to [`MatchSim::step`] per tick
pub struct MatchSim {
    rng: StdRng,
    roster: Vec<PlayerId>,
    online: Vec<PlayerId>,
    ticks: u32,
    round: u32,
}

impl MatchSim {
    pub fn new(players: usize, rng: StdRng) -> Self {
        let roster = (0..players.max(1) as u32).map(PlayerId).collect();
        Self {
            rng,
            roster,
            online: Vec::new(),
            ticks: 0,
            round: 1,
        }
    }

    pub fn from_config(config: &DemoConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::new(config.players, rng)
    }

    pub fn name_of(id: PlayerId) -> String {
        let base = NAMES[id.0 as usize % NAMES.len()];
        match id.0 as usize / NAMES.len() {
            0 => base.to_string(),
            n => format!("{base}{n}"),
        }
    }

    pub fn online(&self) -> &[PlayerId] {
        &self.online
    }

    /// Produce the next event. Everyone joins before anything else happens.
    pub fn step(&mut self) -> MatchEvent {
        self.ticks += 1;

        if self.ticks as usize <= self.roster.len() {
            if let Some(id) = self.first_offline() {
                return self.join(id);
            }
        }

        if self.ticks % ROUND_TICKS == 0 {
            self.round += 1;
            return MatchEvent::RoundEnded { round: self.round };
        }

        let roll: f64 = self.rng.random();
        if roll < 0.05 && self.online.len() > 1 {
            let idx = self.rng.random_range(0..self.online.len());
            let id = self.online.remove(idx);
            return MatchEvent::PlayerLeft { id };
        }
        if roll < 0.10 {
            if let Some(id) = self.first_offline() {
                return self.join(id);
            }
        }
        if roll < 0.35 && self.online.len() > 1 {
            let k = self.rng.random_range(0..self.online.len());
            let mut v = self.rng.random_range(0..self.online.len() - 1);
            if v >= k {
                v += 1;
            }
            return MatchEvent::Eliminated {
                killer: self.online[k],
                victim: self.online[v],
            };
        }

        let idx = self.rng.random_range(0..self.online.len());
        MatchEvent::Scored {
            id: self.online[idx],
            points: self.rng.random_range(1..=5),
        }
    }

    fn first_offline(&self) -> Option<PlayerId> {
        self.roster
            .iter()
            .copied()
            .find(|id| !self.online.contains(id))
    }

    fn join(&mut self, id: PlayerId) -> MatchEvent {
        self.online.push(id);
        MatchEvent::PlayerJoined {
            id,
            name: Self::name_of(id),
        }
    }
}

/// Background task: emit one event per tick until the receiver goes away
pub async fn simulate(config: DemoConfig, tx: mpsc::Sender<MatchEvent>) -> anyhow::Result<()> {
    let mut sim = MatchSim::from_config(&config);
    let mut ticker = tokio::time::interval(Duration::from_millis(config.tick_ms.max(1)));
    info!(players = config.players, tick_ms = config.tick_ms, "match simulation started");

    loop {
        ticker.tick().await;
        let event = sim.step();
        debug!(?event, "match event");
        if tx.send(event).await.is_err() {
            break;
        }
    }

    info!("match simulation stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(players: usize) -> MatchSim {
        MatchSim::new(players, StdRng::seed_from_u64(7))
    }

    #[test]
    fn everyone_joins_first() {
        let mut sim = seeded(3);
        let joined: Vec<MatchEvent> = (0..3).map(|_| sim.step()).collect();
        assert_eq!(
            joined,
            vec![
                MatchEvent::PlayerJoined { id: PlayerId(0), name: "Ada".into() },
                MatchEvent::PlayerJoined { id: PlayerId(1), name: "Bjarne".into() },
                MatchEvent::PlayerJoined { id: PlayerId(2), name: "Grace".into() },
            ]
        );
    }

    #[test]
    fn events_only_reference_online_players() {
        let mut sim = seeded(4);
        for _ in 0..500 {
            let before: Vec<PlayerId> = sim.online().to_vec();
            match sim.step() {
                MatchEvent::Scored { id, points } => {
                    assert!(before.contains(&id));
                    assert!((1..=5).contains(&points));
                }
                MatchEvent::Eliminated { killer, victim } => {
                    assert_ne!(killer, victim);
                    assert!(before.contains(&killer) && before.contains(&victim));
                }
                MatchEvent::PlayerLeft { id } => assert!(before.contains(&id)),
                MatchEvent::PlayerJoined { id, .. } => assert!(!before.contains(&id)),
                MatchEvent::RoundEnded { round } => assert!(round > 1),
            }
            assert!(!sim.online().is_empty());
        }
    }

    #[test]
    fn names_wrap_with_suffix() {
        assert_eq!(MatchSim::name_of(PlayerId(1)), "Bjarne");
        assert_eq!(MatchSim::name_of(PlayerId(13)), "Bjarne1");
    }

    #[tokio::test]
    async fn simulate_stops_when_receiver_drops() {
        let config = DemoConfig {
            players: 2,
            tick_ms: 1,
            seed: Some(1),
            ..DemoConfig::default()
        };
        let (tx, mut rx) = mpsc::channel(4);
        let task = tokio::spawn(simulate(config, tx));

        let first = rx.recv().await.unwrap();
        assert!(matches!(first, MatchEvent::PlayerJoined { id: PlayerId(0), .. }));
        drop(rx);

        let result = tokio::time::timeout(Duration::from_secs(2), task).await;
        assert!(result.unwrap().unwrap().is_ok());
    }
}
