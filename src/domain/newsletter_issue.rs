use crate::domain::CategoryName;

/// A single message to be broadcast to every subscriber of `category`.
#[derive(Debug)]
pub struct NewsletterIssue {
    pub category: CategoryName,
    pub subject: String,
    pub content: String,
}

impl NewsletterIssue {
    pub fn parse(category: String, subject: String, content: String) -> Result<Self, String> {
        let category = CategoryName::parse(category)?;
        if subject.trim().is_empty() {
            return Err("The newsletter subject is empty.".into());
        }
        if content.trim().is_empty() {
            return Err("The newsletter content is empty.".into());
        }
        Ok(Self {
            category,
            subject,
            content,
        })
    }
}
