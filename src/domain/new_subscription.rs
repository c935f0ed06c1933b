use crate::domain::{CategoryName, SubscriberEmail};

/// A request to add the `(email, category)` edge, validated at the HTTP boundary.
#[derive(Debug)]
pub struct NewSubscription {
    pub email: SubscriberEmail,
    pub category: CategoryName,
}
