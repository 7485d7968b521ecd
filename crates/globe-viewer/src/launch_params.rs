//! Launch parameter parsing for the viewer.
//!
//! On native, parameters are parsed from command-line arguments using clap.
//! On WASM, defaults are used (CLI argument parsing is not available).

use std::fmt;

use bevy::prelude::*;
use globe_scene::{GlobeConfig, HoverBehavior, RenderCapabilities};

/// Which globe preset to show.
#[derive(Default, PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(not(target_family = "wasm"), derive(clap::ValueEnum))]
pub enum Variant {
    /// Home-page globe with floating service icons.
    #[default]
    Services,
    /// Decorative network orb.
    Hero,
}

impl Variant {
    pub fn other(self) -> Self {
        match self {
            Self::Services => Self::Hero,
            Self::Hero => Self::Services,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Services => "services",
            Self::Hero => "hero",
        })
    }
}

/// Launch parameters for the viewer.
#[derive(Resource, Debug, Default)]
pub struct LaunchParams {
    /// Initial preset.
    pub variant: Variant,
    /// Override for the icon pool size.
    pub pool_size: Option<usize>,
    pub no_bloom: bool,
    /// Pause instead of slowing down while the globe is hovered.
    pub pause_on_hover: bool,
    pub reduced_motion: bool,
    /// Pretend no GPU is available (forces the static orb).
    pub no_gpu: bool,
}

impl LaunchParams {
    /// Preset for `variant` with the command-line overrides applied.
    pub fn config(&self, variant: Variant) -> GlobeConfig {
        let mut config = match variant {
            Variant::Services => GlobeConfig::services_globe(),
            Variant::Hero => GlobeConfig::hero_orb(),
        };
        if let Some(pool_size) = self.pool_size
            && variant == Variant::Services
        {
            config.icons.pool_size = pool_size;
        }
        if self.no_bloom {
            config.bloom.enabled = false;
        }
        if self.pause_on_hover {
            config.motion.hover = HoverBehavior::Pause;
        }
        config
    }

    pub fn capabilities(&self) -> RenderCapabilities {
        RenderCapabilities {
            gpu_available: !self.no_gpu,
            prefers_reduced_motion: self.reduced_motion,
        }
    }
}

#[cfg(not(target_family = "wasm"))]
mod native {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    #[command(about = "Interactive 3D services globe")]
    #[allow(clippy::struct_excessive_bools)]
    struct CliArgs {
        /// Globe preset to show first.
        #[arg(long, value_enum, default_value_t = Variant::default())]
        variant: Variant,

        /// Number of floating icon slots (services variant only).
        #[arg(long)]
        pool_size: Option<usize>,

        /// Disable the bloom post-process.
        #[arg(long)]
        no_bloom: bool,

        /// Pause the animation while the globe is hovered.
        #[arg(long)]
        pause_on_hover: bool,

        /// Show the static orb instead of the animated scene.
        #[arg(long)]
        reduced_motion: bool,

        /// Behave as if no accelerated rendering context were available.
        #[arg(long)]
        no_gpu: bool,
    }

    pub fn parse() -> LaunchParams {
        let args = CliArgs::parse();
        LaunchParams {
            variant: args.variant,
            pool_size: args.pool_size,
            no_bloom: args.no_bloom,
            pause_on_hover: args.pause_on_hover,
            reduced_motion: args.reduced_motion,
            no_gpu: args.no_gpu,
        }
    }
}

/// Parse launch parameters from CLI args (native) or use defaults (WASM).
pub fn parse() -> LaunchParams {
    #[cfg(not(target_family = "wasm"))]
    {
        native::parse()
    }
    #[cfg(target_family = "wasm")]
    {
        LaunchParams::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply_to_services_only() {
        let params = LaunchParams {
            pool_size: Some(9),
            no_bloom: true,
            pause_on_hover: true,
            ..Default::default()
        };
        let services = params.config(Variant::Services);
        assert_eq!(services.icons.pool_size, 9);
        assert!(!services.bloom.enabled);
        assert_eq!(services.motion.hover, HoverBehavior::Pause);

        let hero = params.config(Variant::Hero);
        assert_eq!(hero.icons.pool_size, 0);
    }

    #[test]
    fn test_capabilities() {
        let params = LaunchParams {
            no_gpu: true,
            ..Default::default()
        };
        assert!(!params.capabilities().gpu_available);
        assert_eq!(Variant::Services.other(), Variant::Hero);
    }
}
