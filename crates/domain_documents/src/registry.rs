//! Generator lookup and rendering

use std::collections::BTreeMap;
use tracing::debug;

use domain_claims::{DocumentRequest, DocumentType, GeneratedClaim};

use crate::error::DocumentError;
use crate::form::TemplateSpec;
use crate::generators::{
    AdoptionCertificateGenerator, BirthCertificateGenerator, CaringCertificationGenerator, DocumentGenerator,
    FosterPlacementGenerator, HcpGenerator, MassIdGenerator, OutOfStateIdGenerator, PregnancyMaternityGenerator,
};
use crate::pdf::fill_pdf_bytes;
use crate::template::TemplateStore;

/// A rendered document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub document_type: DocumentType,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Maps document types to their generators
pub struct DocumentRegistry {
    generators: BTreeMap<DocumentType, Box<dyn DocumentGenerator>>,
}

impl DocumentRegistry {
    pub fn empty() -> Self {
        Self {
            generators: BTreeMap::new(),
        }
    }

    /// A registry with a generator for every document type
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(HcpGenerator));
        registry.register(Box::new(CaringCertificationGenerator));
        registry.register(Box::new(PregnancyMaternityGenerator));
        registry.register(Box::new(BirthCertificateGenerator));
        registry.register(Box::new(AdoptionCertificateGenerator));
        registry.register(Box::new(FosterPlacementGenerator));
        registry.register(Box::new(MassIdGenerator));
        registry.register(Box::new(OutOfStateIdGenerator));
        registry
    }

    /// Registers a generator, replacing any for the same type
    pub fn register(&mut self, generator: Box<dyn DocumentGenerator>) {
        self.generators.insert(generator.document_type(), generator);
    }

    pub fn generator(&self, document_type: DocumentType) -> Result<&dyn DocumentGenerator, DocumentError> {
        self.generators
            .get(&document_type)
            .map(|g| g.as_ref())
            .ok_or(DocumentError::NoGenerator(document_type))
    }

    pub fn templates(&self) -> Vec<TemplateSpec> {
        self.generators.values().map(|g| g.template()).collect()
    }

    /// Renders one requested document
    pub fn render(
        &self,
        claim: &GeneratedClaim,
        request: &DocumentRequest,
        templates: &TemplateStore,
    ) -> Result<RenderedDocument, DocumentError> {
        let generator = self.generator(request.document_type)?;
        let data = generator.form_data(&claim.claim, &request.config)?;
        let template = templates.load(&generator.template())?;
        let bytes = fill_pdf_bytes(&template, &data)?;

        debug!(
            claim_id = %claim.id,
            document = %request.document_type,
            bytes = bytes.len(),
            "Rendered document"
        );
        Ok(RenderedDocument {
            document_type: request.document_type,
            file_name: request.document_type.file_name(),
            bytes,
        })
    }

    /// Renders every document the claim requests, stopping at the first failure
    pub fn render_all(
        &self,
        claim: &GeneratedClaim,
        templates: &TemplateStore,
    ) -> Result<Vec<RenderedDocument>, DocumentError> {
        claim
            .documents
            .iter()
            .map(|request| self.render(claim, request, templates))
            .collect()
    }
}

impl Default for DocumentRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
