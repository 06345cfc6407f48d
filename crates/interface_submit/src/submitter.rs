//! Claim submission port and its REST adapter

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use core_kernel::{DomainPort, PortError};
use domain_claims::{DocumentRequest, GeneratedClaim};
use domain_documents::{DocumentRegistry, TemplateStore};

use crate::client::ClaimsApiClient;
use crate::dto::{ApplicationBody, PaymentPreferenceBody};

/// Identifiers the claims system assigned to a submitted claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub application_id: String,
    #[serde(default)]
    pub fineos_absence_id: Option<String>,
}

/// Port for submitting one claim end to end
#[async_trait]
pub trait ClaimSubmitter: DomainPort {
    async fn submit(&self, claim: &GeneratedClaim) -> Result<SubmissionReceipt, PortError>;
}

/// Submits claims through the claims REST API
///
/// The sequence per claim is: create the application, fill it with the
/// claim body, upload each document, submit, send the payment preference
/// and complete. Documents without a written file are rendered on the fly.
pub struct ApiSubmitter {
    client: ClaimsApiClient,
    registry: DocumentRegistry,
    templates: TemplateStore,
}

impl ApiSubmitter {
    pub fn new(client: ClaimsApiClient, templates: TemplateStore) -> Self {
        Self {
            client,
            registry: DocumentRegistry::standard(),
            templates,
        }
    }

    pub fn with_registry(mut self, registry: DocumentRegistry) -> Self {
        self.registry = registry;
        self
    }

    async fn document_bytes(&self, claim: &GeneratedClaim, request: &DocumentRequest) -> Result<Vec<u8>, PortError> {
        if let Some(path) = &request.path {
            if path.is_file() {
                return tokio::fs::read(path).await.map_err(|e| {
                    PortError::internal(format!("failed to read {}: {}", path.display(), e))
                });
            }
        }
        debug!(claim_id = %claim.id, document = %request.document_type, "Rendering document for upload");
        self.registry
            .render(claim, request, &self.templates)
            .map(|rendered| rendered.bytes)
            .map_err(|e| PortError::Transformation {
                message: format!("{}: {}", request.document_type, e),
            })
    }
}

impl DomainPort for ApiSubmitter {}

#[async_trait]
impl ClaimSubmitter for ApiSubmitter {
    async fn submit(&self, claim: &GeneratedClaim) -> Result<SubmissionReceipt, PortError> {
        let created = self.client.create_application().await?;
        let application_id = created.application_id;

        self.client
            .update_application(&application_id, &ApplicationBody::from(&claim.claim))
            .await?;

        for request in &claim.documents {
            let bytes = self.document_bytes(claim, request).await?;
            self.client
                .upload_document(&application_id, request.document_type, &request.document_type.file_name(), bytes)
                .await?;
        }

        let submitted = self.client.submit_application(&application_id).await?;
        self.client
            .submit_payment_preference(&application_id, &PaymentPreferenceBody::from(&claim.payment_preference))
            .await?;
        let completed = self.client.complete_application(&application_id).await?;

        let receipt = SubmissionReceipt {
            fineos_absence_id: completed.fineos_absence_id.or(submitted.fineos_absence_id),
            application_id,
        };
        info!(
            claim_id = %claim.id,
            application_id = %receipt.application_id,
            fineos_absence_id = receipt.fineos_absence_id.as_deref().unwrap_or("-"),
            "Submitted claim"
        );
        Ok(receipt)
    }
}
