// SPDX-FileCopyrightText: 2026 EstateFlow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The lead-automation pipeline.
//!
//! One sequential chain per ingested message: analyze, persist, reply,
//! publish. The poll loop keeps exactly one pipeline run in flight;
//! cancellation lands between polls.

use std::time::Duration;

use estateflow_airtop::AirtopClient;
use estateflow_core::{
    CredentialRecord, EstateError, Listing, ListingSource, ListingStatus, LogBus, LogLevel,
    LogModule,
};
use estateflow_extractor::{
    GeminiClient, ListingAnalysis, marketplace_script, messenger_script, page_post_script,
};
use estateflow_storage::{Database, queries};
use estateflow_telegram::{TelegramClient, types::TgMessage};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Coordinates ingestion, extraction, persistence, and publication.
pub struct Pipeline {
    telegram: TelegramClient,
    extractor: GeminiClient,
    /// `None` disables publishing (no automation key configured).
    airtop: Option<AirtopClient>,
    credentials: CredentialRecord,
    db: Database,
    bus: LogBus,
    poll_interval: Duration,
    allowed_chat_ids: Vec<i64>,
    offset: Option<i64>,
}

impl Pipeline {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        telegram: TelegramClient,
        extractor: GeminiClient,
        airtop: Option<AirtopClient>,
        credentials: CredentialRecord,
        db: Database,
        bus: LogBus,
        poll_interval: Duration,
        allowed_chat_ids: Vec<i64>,
    ) -> Self {
        Self {
            telegram,
            extractor,
            airtop,
            credentials,
            db,
            bus,
            poll_interval,
            allowed_chat_ids,
            offset: None,
        }
    }

    /// The bus this pipeline reports progress on.
    pub fn log_bus(&self) -> &LogBus {
        &self.bus
    }

    /// Runs the poll loop until the cancellation token is triggered.
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<(), EstateError> {
        info!("pipeline running");
        self.bus
            .publish(LogModule::System, LogLevel::Info, "Pipeline started");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("shutdown signal received, stopping pipeline");
                    break;
                }
                _ = tokio::time::sleep(self.poll_interval) => {
                    if let Err(e) = self.poll_once().await {
                        error!(error = %e, "poll cycle failed");
                        self.bus.publish(
                            LogModule::Network,
                            LogLevel::Error,
                            format!("Poll cycle failed: {e}"),
                        );
                    }
                }
            }
        }

        self.bus
            .publish(LogModule::System, LogLevel::Info, "Pipeline stopped");
        Ok(())
    }

    /// Fetches pending updates and runs each message through the chain.
    ///
    /// A failure on one message is logged and does not stop the others;
    /// the offset advances regardless so poison messages are not re-polled
    /// forever.
    pub async fn poll_once(&mut self) -> Result<(), EstateError> {
        let updates = self.telegram.get_updates(self.offset, 10).await?;

        for update in updates {
            self.offset = Some(update.update_id + 1);

            let Some(message) = update.message else {
                continue;
            };

            if !self.allowed_chat_ids.is_empty()
                && !self.allowed_chat_ids.contains(&message.chat.id)
            {
                debug!(chat_id = message.chat.id, "ignoring unlisted chat");
                continue;
            }

            if let Err(e) = self.handle_message(&message).await {
                error!(error = %e, msg_id = message.message_id, "failed to process message");
                self.bus.publish(
                    LogModule::System,
                    LogLevel::Error,
                    format!("Failed to process message {}: {e}", message.message_id),
                );
            }
        }

        Ok(())
    }

    async fn handle_message(&self, message: &TgMessage) -> Result<(), EstateError> {
        let Some(text) = message.content_text() else {
            debug!(msg_id = message.message_id, "ignoring message without text");
            return Ok(());
        };

        self.bus.publish(
            LogModule::Ingestor,
            LogLevel::Info,
            format!("New message from chat {}", message.chat.id),
        );

        // Typing indicator is cosmetic; failures are not worth aborting for.
        if let Err(e) = self.telegram.send_typing(message.chat.id).await {
            debug!(error = %e, "typing indicator failed");
        }

        let image = match message.largest_photo() {
            Some(photo) => Some(self.telegram.download_photo(&photo.file_id).await?),
            None => None,
        };

        let analysis = self
            .extractor
            .analyze_property_media(text, image.as_deref())
            .await?;

        if !analysis.is_property_listing {
            self.bus.publish(
                LogModule::AiAgent,
                LogLevel::Info,
                "Message is not a property listing",
            );
            self.telegram
                .send_message(message.chat.id, &analysis.reply)
                .await?;
            return Ok(());
        }

        let Some(details) = analysis.property_details() else {
            return Ok(());
        };

        self.bus.publish(
            LogModule::AiAgent,
            LogLevel::Success,
            format!("Extracted listing: {}", details.title),
        );

        let listing = Listing::draft(&details, ListingSource::Telegram);
        queries::listings::insert(&self.db, &listing).await?;

        self.telegram
            .send_message(message.chat.id, &analysis.reply)
            .await?;

        self.publish_listing(&listing, &details, &analysis).await
    }

    async fn publish_listing(
        &self,
        listing: &Listing,
        details: &estateflow_core::PropertyDetails,
        analysis: &ListingAnalysis,
    ) -> Result<(), EstateError> {
        let Some(airtop) = &self.airtop else {
            self.bus.publish(
                LogModule::System,
                LogLevel::Warning,
                "Automation disabled; listing kept as draft",
            );
            return Ok(());
        };

        if !self.credentials.is_set {
            self.bus.publish(
                LogModule::System,
                LogLevel::Warning,
                "No Facebook credentials configured; listing kept as draft",
            );
            return Ok(());
        }

        queries::listings::update_status(&self.db, &listing.id, ListingStatus::Publishing).await?;
        let script = marketplace_script(details, &self.credentials);

        match airtop.post_to_marketplace(&script).await {
            Ok(url) => {
                queries::listings::update_status(&self.db, &listing.id, ListingStatus::Active)
                    .await?;
                self.bus.publish(
                    LogModule::Airtop,
                    LogLevel::Success,
                    format!("Published to Marketplace: {url}"),
                );
                self.run_follow_ups(airtop, analysis).await;
            }
            Err(e) => {
                // The listing survives as a draft for a manual retry.
                warn!(error = %e, listing_id = %listing.id, "marketplace publish failed");
                queries::listings::update_status(&self.db, &listing.id, ListingStatus::Draft)
                    .await?;
                self.bus.publish(
                    LogModule::Airtop,
                    LogLevel::Error,
                    format!("Publish failed: {e}"),
                );
            }
        }

        Ok(())
    }

    /// Page post and Messenger auto-reply after a successful publish.
    /// Failures here degrade the run, they do not undo the listing.
    async fn run_follow_ups(&self, airtop: &AirtopClient, analysis: &ListingAnalysis) {
        if let Some(caption) = &analysis.page_post_caption {
            let script = page_post_script(caption, &self.credentials);
            match airtop.post_to_page(&script).await {
                Ok(_) => self.bus.publish(
                    LogModule::Airtop,
                    LogLevel::Success,
                    "Caption posted to Page",
                ),
                Err(e) => {
                    warn!(error = %e, "page post failed");
                    self.bus.publish(
                        LogModule::Airtop,
                        LogLevel::Warning,
                        format!("Page post failed: {e}"),
                    );
                }
            }
        }

        if let Some(template) = &analysis.messenger_template {
            let script = messenger_script(template, &self.credentials);
            match airtop.run_auto_reply(&script).await {
                Ok(()) => self.bus.publish(
                    LogModule::Airtop,
                    LogLevel::Success,
                    "Messenger auto-reply armed",
                ),
                Err(e) => {
                    warn!(error = %e, "messenger auto-reply failed");
                    self.bus.publish(
                        LogModule::Airtop,
                        LogLevel::Warning,
                        format!("Messenger auto-reply failed: {e}"),
                    );
                }
            }
        }
    }
}
