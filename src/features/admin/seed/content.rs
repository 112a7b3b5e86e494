use minijinja::{context, Environment};

use crate::core::error::{AppError, Result};
use crate::features::admin::seed::data::SeedConcept;

/// Roles listed on every seeded concept
pub const SEED_JOB_ROLES: &str = "Business Analyst, Senior Business Analyst, Product Manager, \
Product Owner, Strategy Consultant, Management Consultant, Project Manager, Program Manager, \
Agile Coach, Scrum Master, Business Architect, Enterprise Architect, Process Analyst, \
Data Analyst, Operations Manager, Change Manager";

const TEMPLATES: &[(&str, &str)] = &[
    (
        "detailed_description",
        include_str!("../../../../templates/seed/detailed_description.jinja"),
    ),
    (
        "how_to_perform",
        include_str!("../../../../templates/seed/how_to_perform.jinja"),
    ),
    (
        "best_practices",
        include_str!("../../../../templates/seed/best_practices.jinja"),
    ),
    (
        "real_world_examples",
        include_str!("../../../../templates/seed/real_world_examples.jinja"),
    ),
    (
        "pros_and_cons",
        include_str!("../../../../templates/seed/pros_and_cons.jinja"),
    ),
    (
        "related_concepts",
        include_str!("../../../../templates/seed/related_concepts.jinja"),
    ),
];

/// Long-text fields generated for a seeded concept
#[derive(Debug, Clone, PartialEq)]
pub struct ConceptContent {
    pub detailed_description: String,
    pub how_to_perform: String,
    pub best_practices: String,
    pub real_world_examples: String,
    pub job_roles: String,
    pub pros_and_cons: String,
    pub related_concepts: String,
    pub tags: Vec<String>,
}

/// Renders seed concept content from the embedded templates
pub struct ContentRenderer {
    env: Environment<'static>,
}

impl ContentRenderer {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        for &(name, source) in TEMPLATES {
            env.add_template(name, source).map_err(|e| {
                tracing::error!("Failed to compile seed template {}: {:?}", name, e);
                AppError::Internal(format!("Invalid seed template {}: {}", name, e))
            })?;
        }
        Ok(Self { env })
    }

    fn render(&self, name: &str, ctx: &minijinja::Value) -> Result<String> {
        self.env
            .get_template(name)
            .and_then(|template| template.render(ctx))
            .map_err(|e| AppError::Internal(format!("Failed to render {}: {}", name, e)))
    }

    pub fn render_concept(
        &self,
        category: &str,
        subcategory: &str,
        concept: &SeedConcept,
    ) -> Result<ConceptContent> {
        let ctx = context! {
            concept => concept.name.as_str(),
            category => category,
            description => concept.short_description.as_str(),
        };

        Ok(ConceptContent {
            detailed_description: self.render("detailed_description", &ctx)?,
            how_to_perform: self.render("how_to_perform", &ctx)?,
            best_practices: self.render("best_practices", &ctx)?,
            real_world_examples: self.render("real_world_examples", &ctx)?,
            job_roles: SEED_JOB_ROLES.to_string(),
            pros_and_cons: self.render("pros_and_cons", &ctx)?,
            related_concepts: self.render("related_concepts", &ctx)?,
            tags: vec![
                category.to_string(),
                subcategory.to_string(),
                "Business Analysis".to_string(),
                "Framework".to_string(),
            ],
        })
    }
}
