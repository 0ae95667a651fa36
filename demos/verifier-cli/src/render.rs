//! Plain-text rendering of the verifier view.

use std::fmt::Write as _;

use credibil_verify::attribute::CredentialKind;
use credibil_verify::flow::FlowStatus;
use credibil_verify::view::{Card, ViewModel};

/// Render a credential card. Absent fields are left out.
pub fn card(card: &Card) -> String {
    let title = match card.kind {
        CredentialKind::Licence => "Mobile Driving Licence",
        CredentialKind::Credential => "Health Credential",
    };
    let mut out = format!("{title}\n");
    for field in &card.fields {
        if let Some(value) = &field.value {
            let _ = writeln!(out, "  {}: {value}", field.label);
        }
    }
    out
}

/// Render the prompt or result for the current step.
pub fn view(view: &ViewModel) -> String {
    let mut out = String::new();
    match view.status {
        FlowStatus::NotStarted => out.push_str("Start MDL Presentation Flow\n"),
        FlowStatus::LicenceWaiting => {
            if let Some(url) = &view.wallet_url {
                let _ = writeln!(out, "Open {url}\nto open your wallet and present your MDL credential");
            }
        }
        FlowStatus::LicenceFetching => out.push_str("Fetching licence result...\n"),
        FlowStatus::LicenceVerified => {
            if let Some(licence) = &view.licence {
                out.push_str(&card(licence));
            }
        }
        FlowStatus::CredentialWaiting => {
            if let Some(url) = &view.wallet_url {
                let _ = writeln!(out, "Open {url}\nto open your wallet and present your VC credential");
            }
        }
        FlowStatus::CredentialVerified => {
            for credential in &view.credentials {
                out.push_str(&card(credential));
            }
            out.push_str("All Done\n");
        }
    }
    if let Some(error) = &view.error {
        let _ = writeln!(out, "error: {error}");
    }
    out
}
