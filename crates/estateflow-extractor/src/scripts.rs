// SPDX-FileCopyrightText: 2026 EstateFlow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builders for the cloud-browser automation scripts.
//!
//! Every task script is prefixed with a login preamble matching the
//! configured auth method. Records with `is_set == false` get the bare
//! task -- the session is expected to be authenticated some other way.

use estateflow_core::{AuthMethod, CredentialRecord, PropertyDetails};

/// Prefixes `task` with the login steps for `creds`.
pub fn with_login(creds: &CredentialRecord, task: &str) -> String {
    if !creds.is_set {
        return task.to_string();
    }

    match creds.auth_method {
        AuthMethod::Cookies => {
            let Some(cookies) = creds.cookies.as_deref() else {
                return task.to_string();
            };
            format!(
                "1. Authenticate using these session cookies for facebook.com:\n\
                 {cookies}\n\
                 2. Navigate to https://www.facebook.com and confirm the session is active.\n\
                 3. Once session is verified, proceed with:\n\
                 {task}"
            )
        }
        AuthMethod::Credentials => {
            let (Some(email), Some(password)) = (creds.email.as_deref(), creds.password.as_deref())
            else {
                return task.to_string();
            };
            format!(
                "1. Navigate to https://www.facebook.com/login.\n\
                 2. If you see an email field, fill in \"{email}\".\n\
                 3. Fill the password field with \"{password}\".\n\
                 4. Click 'Log In'. Wait for the dashboard to load.\n\
                 5. Once logged in, proceed with the following task:\n\
                 {task}"
            )
        }
    }
}

/// Script that creates a Marketplace listing from extracted details.
pub fn marketplace_script(details: &PropertyDetails, creds: &CredentialRecord) -> String {
    let task = format!(
        "Navigate to https://www.facebook.com/marketplace/create/item.\n\
         Select 'Property for Sale or Rent'.\n\
         Upload the property image from media assets.\n\
         Set title to \"{} @ {}\".\n\
         Set price to \"{}\".\n\
         Set location to \"{}\".\n\
         Fill description: \"{}. Features: {} Beds, {} Baths.\"\n\
         Click 'Next' and 'Publish'.",
        details.title,
        details.location,
        details.price,
        details.location,
        details.description,
        details.beds.unwrap_or(0),
        details.baths.unwrap_or(0),
    );
    with_login(creds, &task)
}

/// Script that posts a caption to the Page timeline.
pub fn page_post_script(caption: &str, creds: &CredentialRecord) -> String {
    let task = format!(
        "Navigate to your Facebook Page timeline.\n\
         Click 'Create Post'.\n\
         Upload the image from assets.\n\
         Paste caption: \"{caption}\".\n\
         Click 'Post'."
    );
    with_login(creds, &task)
}

/// Script that answers pending Messenger availability questions.
pub fn messenger_script(reply_template: &str, creds: &CredentialRecord) -> String {
    let task = format!(
        "Navigate to https://www.facebook.com/messages/t/.\n\
         Search for new messages asking about availability.\n\
         Reply with: \"{reply_template}\"."
    );
    with_login(creds, &task)
}
