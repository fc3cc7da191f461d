//! Anatomy Sim - Entry Point
//!
//! Spawns one creature from a body template, applies a sequence of hits and
//! prints the medical scanner readout.

use anatomy_sim::anatomy::category::OrganCategory;
use anatomy_sim::bone::CombatAction;
use anatomy_sim::content::{load_content, Content};
use anatomy_sim::core::error::Result;
use anatomy_sim::damage::{DamageOptions, DamageRouter, DamageSpecifier, DamageType, SplitDamageBehavior};
use anatomy_sim::ecs::world::AnatomyWorld;
use anatomy_sim::events::AnatomyEvent;
use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Anatomy Sim - apply damage to a creature and inspect the result
#[derive(Parser, Debug)]
#[command(name = "anatomy-sim")]
#[command(about = "Route damage through a creature's anatomy and print a medical readout")]
struct Args {
    /// Content file (TOML); the built-in content is used when omitted
    #[arg(long)]
    content: Option<PathBuf>,

    /// Body template to spawn
    #[arg(long, default_value = "human")]
    template: String,

    /// Hit as CATEGORY:TYPE=AMOUNT, e.g. ArmLeft:Blunt=30 or body:Slash=-5
    #[arg(long = "hit", value_parser = parse_hit)]
    hits: Vec<Hit>,

    /// Split policy for hits aimed at the whole body
    #[arg(long, value_enum, default_value_t = SplitArg::Split)]
    split: SplitArg,

    /// Let called shots miss
    #[arg(long)]
    can_miss: bool,

    /// Roll a fumble check for this attack kind after the hits
    #[arg(long, value_enum)]
    fumble: Option<ActionArg>,

    /// Starting tick, feeds deterministic rolls
    #[arg(long, default_value_t = 0)]
    tick: u64,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Include every emitted event in the output
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SplitArg {
    None,
    Split,
    Organic,
    Damaged,
}

impl From<SplitArg> for SplitDamageBehavior {
    fn from(arg: SplitArg) -> Self {
        match arg {
            SplitArg::None => SplitDamageBehavior::None,
            SplitArg::Split => SplitDamageBehavior::Split,
            SplitArg::Organic => SplitDamageBehavior::SplitEnsureAllOrganic,
            SplitArg::Damaged => SplitDamageBehavior::SplitEnsureAllDamaged,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ActionArg {
    Melee,
    Ranged,
}

impl From<ActionArg> for CombatAction {
    fn from(arg: ActionArg) -> Self {
        match arg {
            ActionArg::Melee => CombatAction::Melee,
            ActionArg::Ranged => CombatAction::Ranged,
        }
    }
}

/// One `--hit` argument
#[derive(Debug, Clone)]
struct Hit {
    /// `None` aims at the whole body
    target: Option<OrganCategory>,
    damage_type: DamageType,
    amount: f32,
}

fn parse_hit(raw: &str) -> std::result::Result<Hit, String> {
    let (target, rest) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected CATEGORY:TYPE=AMOUNT, got '{}'", raw))?;
    let (damage_type, amount) = rest
        .split_once('=')
        .ok_or_else(|| format!("expected TYPE=AMOUNT, got '{}'", rest))?;

    let target = if target.eq_ignore_ascii_case("body") {
        None
    } else {
        let category = OrganCategory::external()
            .into_iter()
            .chain(OrganCategory::internal())
            .find(|c| format!("{:?}", c).eq_ignore_ascii_case(target))
            .ok_or_else(|| format!("unknown organ category '{}'", target))?;
        Some(category)
    };
    let damage_type = DamageType::all()
        .into_iter()
        .find(|t| format!("{:?}", t).eq_ignore_ascii_case(damage_type))
        .ok_or_else(|| format!("unknown damage type '{}'", damage_type))?;
    let amount: f32 = amount
        .parse()
        .map_err(|e| format!("bad amount '{}': {}", amount, e))?;

    Ok(Hit {
        target,
        damage_type,
        amount,
    })
}

/// JSON output structure
#[derive(Serialize)]
struct RunOutput {
    template: String,
    hits: Vec<HitResult>,
    fumbled: Option<bool>,
    readout: Option<anatomy_sim::medical::MedicalReadout>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    events: Vec<AnatomyEvent>,
}

#[derive(Serialize)]
struct HitResult {
    target: Option<OrganCategory>,
    requested: DamageSpecifier,
    realized: DamageSpecifier,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("anatomy_sim=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let content = match &args.content {
        Some(path) => load_content(path)?,
        None => Content::builtin()?,
    };
    let template = content.template(&args.template)?;

    let mut world = AnatomyWorld::new(content.anatomy.clone());
    world.current_tick = args.tick;
    let router = DamageRouter::new(content.damage.clone());
    let body = world.spawn_creature(&args.template, template);
    world.drain_events();

    let mut results = Vec::new();
    for hit in &args.hits {
        let requested = DamageSpecifier::of(hit.damage_type, hit.amount);
        let options = DamageOptions {
            target_part: hit.target,
            split: args.split.into(),
            can_miss: args.can_miss,
            ..Default::default()
        };
        let realized = router.apply_damage(&mut world, body, &requested, &options);
        tracing::info!(part = ?hit.target, ?realized, "hit applied");
        results.push(HitResult {
            target: hit.target,
            requested,
            realized,
        });
        world.tick();
    }

    let fumbled = args
        .fumble
        .map(|action| world.check_fumble(body, action.into()));
    let events = if args.verbose {
        world.drain_events()
    } else {
        Vec::new()
    };

    let output = RunOutput {
        template: args.template.clone(),
        hits: results,
        fumbled,
        readout: world.medical_scan(body),
        events,
    };

    match args.format {
        OutputFormat::Text => print_text(&output),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&output)?),
    }
    Ok(())
}

fn print_text(output: &RunOutput) {
    println!("=== {} ===", output.template);
    for hit in &output.hits {
        let target = hit
            .target
            .map_or("body", |c| c.display_name());
        println!(
            "  hit {:<12} requested {:>7.1} realized {:>7.1}",
            target,
            hit.requested.total(),
            hit.realized.total()
        );
    }
    if let Some(fumbled) = output.fumbled {
        println!("  fumble check: {}", if fumbled { "FUMBLED" } else { "ok" });
    }
    let Some(readout) = &output.readout else {
        return;
    };
    println!();
    for organ in &readout.organs {
        let bone = organ
            .bone
            .as_ref()
            .map_or(String::new(), |b| format!(" bone {}", b.severity.display_name()));
        println!(
            "  {:<12} {:>6.1}/{:<6.1} {:<9}{} traumas {}",
            organ.category.display_name(),
            organ.integrity,
            organ.cap,
            organ.severity.display_name(),
            bone,
            organ.traumas.len()
        );
    }
    println!();
    println!("  total damage   {:.1}", readout.total_damage);
    println!("  pain           {:.1}", readout.total_pain);
    println!("  bleeding       {:.2}", readout.total_bleeding);
    println!("  delay x        {:.2}", readout.interaction_delay_multiplier);
    println!("  movement x     {:.2}", readout.movement_speed_modifier);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_defaults_to_json() {
        let args = Args::try_parse_from(["anatomy-sim"]).unwrap();
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn test_format_accepts_text_and_rejects_unknown() {
        let args = Args::try_parse_from(["anatomy-sim", "--format", "text"]).unwrap();
        assert_eq!(args.format, OutputFormat::Text);
        assert!(Args::try_parse_from(["anatomy-sim", "--format", "yaml"]).is_err());
    }

    #[test]
    fn test_parse_hit() {
        let hit = parse_hit("ArmLeft:Blunt=30").unwrap();
        assert_eq!(hit.target, Some(OrganCategory::ArmLeft));
        assert_eq!(hit.damage_type, DamageType::Blunt);
        assert_eq!(hit.amount, 30.0);

        let heal = parse_hit("body:slash=-5").unwrap();
        assert!(heal.target.is_none());
        assert_eq!(heal.amount, -5.0);

        assert!(parse_hit("Tail:Blunt=3").is_err());
    }
}
