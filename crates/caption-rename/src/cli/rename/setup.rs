//! Run setup: plan validation, config overrides, device and provider selection.
//!
//! Nothing here touches image files. The output directory is created last,
//! once every other check has passed.

use caption_rename_core::caption::{gpu_available, resolve_device, CaptionProviderFactory};
use caption_rename_core::{CaptionProvider, Config, Device, RunOptions, RunPlan};

use super::RenameArgs;

/// Everything the batch needs, assembled by [`build_context`].
pub(crate) struct RenameContext {
    pub config: Config,
    pub plan: RunPlan,
    pub device: Device,
    pub provider: Box<dyn CaptionProvider>,
}

/// Validate the invocation and assemble the run context.
pub fn build_context(args: &RenameArgs, mut config: Config) -> anyhow::Result<RenameContext> {
    let options = RunOptions {
        input: args.input.clone(),
        in_place: args.in_place,
        output_path: args.output_path.clone(),
        device: args.device.map(Into::into),
    };
    let plan = RunPlan::from_options(&options)?;

    if let Some(provider) = args.provider {
        config.caption.provider = provider.to_string();
    }

    let device = resolve_device(plan.device, gpu_available());
    let provider = CaptionProviderFactory::create(
        &config.caption.provider,
        &config.caption,
        args.model.as_deref(),
        device,
    )?;
    tracing::info!("Captioning with {} on {}", provider.name(), device);

    plan.prepare()?;

    Ok(RenameContext {
        config,
        plan,
        device,
        provider,
    })
}
