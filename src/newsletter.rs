use anyhow::anyhow;

/// Metadata for one of the newsletters this service can sign addresses up
/// for. The set is hardcoded: each id doubles as the identifier of the
/// corresponding mailing list at the provider.
#[derive(Clone, Debug)]
pub struct NewsletterMeta {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Mailing list address, derived from the configured mail domain.
    pub list_address: String,
}

pub const DISPATCH_ID: &str = "dispatch";
pub const FIELD_NOTES_ID: &str = "field-notes";

/// Returns metadata for the given newsletter id, with `list_address` filled
/// in from the mailing domain.
pub fn meta_for(mail_domain: &str, id: &str) -> Result<NewsletterMeta, anyhow::Error> {
    let (id, name, description) = match id {
        DISPATCH_ID => (
            DISPATCH_ID,
            "The Dispatch",
            "A weekly newsletter on software, systems, and sustainability.",
        ),
        FIELD_NOTES_ID => (
            FIELD_NOTES_ID,
            "Field Notes",
            "An occasional personal newsletter about exploration, ideas, and software.",
        ),
        other => return Err(anyhow!("unknown newsletter: {:?}", other)),
    };

    Ok(NewsletterMeta {
        id,
        name,
        description,
        list_address: format!("{}@{}", id, mail_domain),
    })
}
