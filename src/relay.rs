//! Forwards a citation to an external form-collection endpoint.
//!
//! The endpoint answers cross-origin with an opaque response, so its body is never read.
//! Getting a response at all counts as success.

use std::collections::BTreeMap;

use reqwest::Client;
use tracing::{error, info};

use crate::{config::RelayConfig, error::RelayError, types::quantity::Quantity};

pub struct SubmissionRelay {
    client:        Client,
    endpoint:      String,
    content_field: String,
    hidden_fields: BTreeMap<String, String>,
}

impl SubmissionRelay {
    pub fn new(client: Client, config: &RelayConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint.clone(),
            content_field: config.content_field.clone(),
            hidden_fields: config.hidden_fields.clone(),
        }
    }

    /// Form fields posted for one submission: the annotated citation plus the fixed tokens.
    pub fn payload(&self, citation: &str, quantity: Quantity) -> Vec<(String, String)> {
        let mut fields = vec![(self.content_field.clone(), annotate(citation, quantity))];
        fields.extend(
            self.hidden_fields
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        fields
    }

    /// Rejects a bad `quantity` without sending anything.
    pub async fn submit(&self, citation: &str, quantity: &str) -> Result<(), RelayError> {
        let quantity: Quantity = quantity.parse()?;
        let payload = self.payload(citation, quantity);
        match self.client.post(&self.endpoint).form(&payload).send().await {
            Ok(resp) => {
                info!("Submitted {quantity} units to {} ({}).", self.endpoint, resp.status());
                Ok(())
            }
            Err(e) => {
                error!("Submission to {} failed: {:#}", self.endpoint, anyhow::Error::new(e));
                Err(RelayError::Unavailable)
            }
        }
    }
}

pub fn annotate(citation: &str, quantity: Quantity) -> String {
    format!("{citation} + [{quantity} units]")
}
