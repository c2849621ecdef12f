// FILE: crates/cli/src/setup.rs
//! Builds runtime components from the loaded configuration

use anyhow::{bail, Context, Result};
use std::sync::Arc;
use vinylcast_config::{AssistantConfig, CommunityConfig, PlayerConfig};
use vinylcast_media_engine::{TransitionWindows, TurntableSettings};
use vinylcast_network::{
    Assistant, Client, ClientConfig, GeminiEndpoint, GenerationConfig, QnaBoard, QnaLimits,
    RealtimeDbStore,
};

pub fn turntable_settings(player: &PlayerConfig) -> TurntableSettings {
    TurntableSettings {
        windows: TransitionWindows {
            sleeve_reveal: player.sleeve_reveal(),
            disk_swap: player.disk_swap(),
        },
        frame_interval: player.frame_interval(),
        auto_advance: player.auto_advance,
    }
}

pub fn generation_config(assistant: &AssistantConfig) -> GenerationConfig {
    GenerationConfig {
        temperature: assistant.temperature,
        top_k: assistant.top_k,
        top_p: assistant.top_p,
        max_output_tokens: assistant.max_output_tokens,
    }
}

pub fn qna_limits(community: &CommunityConfig) -> QnaLimits {
    QnaLimits {
        max_name_chars: community.max_name_chars,
        max_question_chars: community.max_question_chars,
        feed_limit: community.feed_limit,
    }
}

pub fn assistant(config: &AssistantConfig) -> Result<Assistant> {
    let Some(api_key) = config.api_key() else {
        bail!(
            "No API key found. Set {} to use the assistant.",
            config.api_key_env
        );
    };

    // the endpoint call is bounded by the assistant's own timeout
    let client = Client::with_config(ClientConfig {
        timeout: config.request_timeout() * 2,
        ..ClientConfig::default()
    })
    .context("Failed to create HTTP client")?;

    let endpoint = GeminiEndpoint::new(client, api_key)
        .with_base_url(config.base_url.clone())
        .with_model(config.model.clone())
        .with_generation(generation_config(config));

    Ok(Assistant::new(Arc::new(endpoint), config.min_request_interval())
        .with_timeout(config.request_timeout()))
}

pub fn qna_board(config: &CommunityConfig) -> Result<QnaBoard> {
    if !config.is_enabled() {
        bail!("The community board is not configured. Set community.database_url first.");
    }

    let client = Client::new().context("Failed to create HTTP client")?;
    let mut store = RealtimeDbStore::new(client, config.database_url.clone())
        .context("Invalid community.database_url")?
        .with_collection(config.collection.clone());
    if let Some(token) = config.auth_token() {
        store = store.with_auth_token(token);
    }

    Ok(QnaBoard::with_limits(Arc::new(store), qna_limits(config)))
}
