use anyhow::Context;
use tera::Tera;

use crate::newsletter::NewsletterMeta;

/// Renders confirmation-message bodies from the templates directory.
///
/// Every render gets a default set of context values (newsletter metadata and
/// the public base URL) on top of the per-call ones.
pub struct Renderer {
    tera: Tera,
    meta: NewsletterMeta,
    public_url: String,
}

impl Renderer {
    pub fn new(
        templates_glob: &str,
        meta: NewsletterMeta,
        public_url: String,
    ) -> Result<Self, anyhow::Error> {
        let tera = Tera::new(templates_glob)
            .with_context(|| format!("Failed to compile templates at {:?}", templates_glob))?;
        Ok(Self {
            tera,
            meta,
            public_url,
        })
    }

    pub fn meta(&self) -> &NewsletterMeta {
        &self.meta
    }

    pub fn confirmation_subject(&self) -> String {
        format!("{} signup confirmation", self.meta.name)
    }

    pub fn render(&self, template: &str, token: &str) -> Result<String, anyhow::Error> {
        let mut context = tera::Context::new();
        context.insert("newsletter_name", self.meta.name);
        context.insert("newsletter_description", self.meta.description);
        context.insert("list_address", &self.meta.list_address);
        context.insert("public_url", &self.public_url);
        context.insert("token", token);

        self.tera
            .render(template, &context)
            .with_context(|| format!("Failed to render template {:?}", template))
    }
}
