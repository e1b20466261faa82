//! Headless round driver: runs a batch of rounds with random agents and
//! prints one JSON round result per line. No window, no frame pacing.
//!
//! Usage: headless [--rounds N] [--agents N] [--seed S]

use anyhow::{Context, bail};
use rand::{Rng, SeedableRng, rngs::SmallRng};

use flappy_flock::agent::{Agent, RandomAgent};
use flappy_flock::config::SimConfig;
use flappy_flock::round::{Phase, Round};
use flappy_flock::sprite::SpriteSet;

struct Options {
    rounds: u32,
    agents: usize,
    seed: u64,
}

fn parse_args() -> anyhow::Result<Options> {
    let mut opts = Options { rounds: 10, agents: 10, seed: rand::random() };
    let mut args = std::env::args().skip(1);
    while let Some(flag) = args.next() {
        let mut value = |name: &str| {
            args.next()
                .with_context(|| format!("{name} needs a value"))
        };
        match flag.as_str() {
            "--rounds" => opts.rounds = value("--rounds")?.parse()?,
            "--agents" => opts.agents = value("--agents")?.parse()?,
            "--seed" => opts.seed = value("--seed")?.parse()?,
            other => bail!("unknown argument: {other}"),
        }
    }
    if opts.agents == 0 {
        bail!("--agents must be at least 1");
    }
    Ok(opts)
}

fn main() -> anyhow::Result<()> {
    let opts = parse_args()?;
    let cfg = SimConfig::load("flock.json")?;
    let sprites = SpriteSet::generate(
        cfg.field_width as u32,
        cfg.field_height as u32,
        cfg.ground_y as u32,
    );
    let mut seeder = SmallRng::seed_from_u64(opts.seed);

    eprintln!(
        "running {} rounds with {} agents (seed {})",
        opts.rounds, opts.agents, opts.seed
    );

    for _ in 0..opts.rounds {
        let agents: Vec<Box<dyn Agent>> = (0..opts.agents)
            .map(|_| Box::new(RandomAgent::seeded(seeder.r#gen())) as Box<dyn Agent>)
            .collect();
        let mut round = Round::new(cfg.clone(), agents, seeder.r#gen());
        while round.phase == Phase::Running {
            round.step(&sprites);
        }
        let result = round.result().expect("ended round has a result");
        println!("{}", serde_json::to_string(result)?);
    }
    Ok(())
}
