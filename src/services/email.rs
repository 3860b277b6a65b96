use chrono::Utc;

use crate::models::{EmailReceipt, Recommendation};

pub const RECOMMENDATION_SUBJECT: &str = "Your Library Recommendation";

/// Fixed email body for a recommendation
pub fn format_recommendation_email(user_name: &str, recommendation: &Recommendation) -> String {
    format!(
        "Hi {},\n\n\
         Based on your interests, we recommend the following book:\n\n\
         Title: {}\n\
         Synopsis: {}\n\
         Why You'll Like It: {}\n\n\
         Happy Reading!\n",
        user_name, recommendation.title, recommendation.synopsis, recommendation.feedback
    )
}

/// Placeholder mailer: nothing is delivered, the inputs are echoed back
pub fn send_email(to: &str, subject: &str, body: &str) -> EmailReceipt {
    tracing::info!(to = %to, subject = %subject, "Email placeholder invoked; no delivery");

    EmailReceipt {
        to: to.to_string(),
        subject: subject.to_string(),
        body: body.to_string(),
        sent_at: Utc::now(),
    }
}
