mod category_name;
mod new_subscription;
mod newsletter_issue;
mod subscriber_email;

pub use category_name::CategoryName;
pub use new_subscription::NewSubscription;
pub use newsletter_issue::NewsletterIssue;
pub use subscriber_email::SubscriberEmail;
