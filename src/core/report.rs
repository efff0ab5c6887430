//! Pipeline reporting.
//!
//! This module counts work at each stage of the pipeline and renders the
//! counts as a short text summary with Japanese labels. The binary logs the
//! summary at startup; admin dashboards can use the structured form.

use crate::{
    core::{application::list_unprovisioned_approvals, vocabulary::Vocabulary},
    entities::{
        DiagnosisRequest, Inquiry, Order, PartnerApplication, diagnosis_request, inquiry, order,
        partner_application,
        status::{ApplicationStatus, DiagnosisStatus, InquiryStatus, OrderStatus},
    },
    errors::Result,
};
use sea_orm::{DatabaseConnection, Iterable, PaginatorTrait, prelude::*};

/// Counts of records at each stage of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSummary {
    /// Diagnosis requests per status, in pipeline order
    pub diagnoses: Vec<(DiagnosisStatus, u64)>,
    /// Orders per status, in pipeline order
    pub orders: Vec<(OrderStatus, u64)>,
    /// Applications waiting for review
    pub applications_under_review: u64,
    /// Approved applications with no partner account
    pub unprovisioned_approvals: u64,
    /// Inquiries nobody has picked up yet
    pub pending_inquiries: u64,
}

impl PipelineSummary {
    /// Total number of diagnosis requests.
    #[must_use]
    pub fn total_diagnoses(&self) -> u64 {
        self.diagnoses.iter().map(|(_, count)| count).sum()
    }

    /// Number of diagnosis requests in `status`.
    #[must_use]
    pub fn diagnoses_in(&self, status: DiagnosisStatus) -> u64 {
        self.diagnoses
            .iter()
            .find(|(s, _)| *s == status)
            .map_or(0, |(_, count)| *count)
    }
}

/// Collects the pipeline counts.
pub async fn pipeline_summary(db: &DatabaseConnection) -> Result<PipelineSummary> {
    let mut diagnoses = Vec::new();
    for status in DiagnosisStatus::iter() {
        let count = DiagnosisRequest::find()
            .filter(diagnosis_request::Column::Status.eq(status))
            .count(db)
            .await?;
        diagnoses.push((status, count));
    }

    let mut orders = Vec::new();
    for status in OrderStatus::iter() {
        let count = Order::find()
            .filter(order::Column::OrderStatus.eq(status))
            .count(db)
            .await?;
        orders.push((status, count));
    }

    let applications_under_review = PartnerApplication::find()
        .filter(partner_application::Column::ApplicationStatus.eq(ApplicationStatus::UnderReview))
        .count(db)
        .await?;
    let unprovisioned_approvals = list_unprovisioned_approvals(db).await?.len() as u64;
    let pending_inquiries = Inquiry::find()
        .filter(inquiry::Column::InquiryStatus.eq(InquiryStatus::Pending))
        .count(db)
        .await?;

    Ok(PipelineSummary {
        diagnoses,
        orders,
        applications_under_review,
        unprovisioned_approvals,
        pending_inquiries,
    })
}

/// Share of diagnosis requests that reached a contractor decision, in percent.
#[must_use]
pub fn decision_rate(summary: &PipelineSummary) -> f64 {
    let total = summary.total_diagnoses();
    if total == 0 {
        return 0.0;
    }

    #[allow(clippy::cast_precision_loss)]
    let rate = summary.diagnoses_in(DiagnosisStatus::Decided) as f64 / total as f64 * 100.0;
    rate
}

/// Generates a text bar like: `[████████░░] 80.0%`
#[must_use]
pub fn format_progress_bar(progress_percent: f64, bar_length: Option<usize>) -> String {
    let length = bar_length.unwrap_or(10);
    let clamped_progress = progress_percent.clamp(0.0, 100.0);

    // clamped_progress is in [0, 100] and length is small, so the product fits
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let filled = ((clamped_progress / 100.0) * length as f64).round() as usize;
    let empty = length.saturating_sub(filled);

    format!(
        "[{}{}] {progress_percent:.1}%",
        "█".repeat(filled),
        "░".repeat(empty)
    )
}

/// Renders the summary with Japanese status labels.
#[must_use]
pub fn format_pipeline_summary(summary: &PipelineSummary) -> String {
    let mut lines = vec![format!("診断依頼 ({}件)", summary.total_diagnoses())];
    lines.extend(
        summary
            .diagnoses
            .iter()
            .map(|(status, count)| format!("  {}: {count}", status.label())),
    );
    lines.push(format!(
        "  業者決定率: {}",
        format_progress_bar(decision_rate(summary), None)
    ));

    lines.push("受注".to_string());
    lines.extend(
        summary
            .orders
            .iter()
            .map(|(status, count)| format!("  {}: {count}", status.label())),
    );

    lines.push(format!(
        "加盟店申請 {}: {}",
        ApplicationStatus::UnderReview.label(),
        summary.applications_under_review
    ));
    lines.push(format!(
        "加盟店未作成の承認済み申請: {}",
        summary.unprovisioned_approvals
    ));
    lines.push(format!(
        "お問い合わせ {}: {}",
        InquiryStatus::Pending.label(),
        summary.pending_inquiries
    ));

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::{application::review_application, decision::decide_contractor};
    use crate::test_utils::*;

    fn summary_with(decided: u64, comparing: u64) -> PipelineSummary {
        PipelineSummary {
            diagnoses: DiagnosisStatus::iter()
                .map(|status| match status {
                    DiagnosisStatus::Decided => (status, decided),
                    DiagnosisStatus::Comparing => (status, comparing),
                    _ => (status, 0),
                })
                .collect(),
            orders: OrderStatus::iter().map(|status| (status, 0)).collect(),
            applications_under_review: 0,
            unprovisioned_approvals: 0,
            pending_inquiries: 0,
        }
    }

    #[test]
    fn test_decision_rate() {
        assert_eq!(decision_rate(&summary_with(0, 0)), 0.0);
        assert_eq!(decision_rate(&summary_with(1, 3)), 25.0);
        assert_eq!(decision_rate(&summary_with(2, 0)), 100.0);
    }

    #[test]
    fn test_format_progress_bar() {
        assert_eq!(format_progress_bar(100.0, Some(10)), "[██████████] 100.0%");
        assert_eq!(format_progress_bar(50.0, Some(10)), "[█████░░░░░] 50.0%");
        assert_eq!(format_progress_bar(0.0, Some(4)), "[░░░░] 0.0%");
    }

    #[test]
    fn test_format_uses_labels() {
        let text = format_pipeline_summary(&summary_with(1, 3));
        assert!(text.starts_with("診断依頼 (4件)"));
        assert!(text.contains("業者決定: 1"));
        assert!(text.contains("見積もり比較中: 3"));
        assert!(text.contains("施工完了: 0"));
        assert!(text.contains("審査中: 0"));
        assert!(text.contains("未対応: 0"));
        assert!(!text.contains("DECIDED"));
        // Heading, five statuses, rate, heading, five statuses, three counters
        assert_eq!(text.lines().count(), 16);
        assert!(text.ends_with("お問い合わせ 未対応: 0"));
    }

    #[tokio::test]
    async fn test_pipeline_summary_counts() -> Result<()> {
        let fx = setup_comparing_diagnosis().await?;
        let admin = test_identity();
        decide_contractor(&fx.db, Some(&admin), fx.diagnosis.id, fx.quotation_a.id).await?;

        let approved = create_test_application(&fx.db, "承認塗装").await?;
        create_test_application(&fx.db, "審査塗装").await?;
        review_application(&fx.db, Some(&admin), approved.id, ApplicationStatus::Approved).await?;

        let summary = pipeline_summary(&fx.db).await?;
        // The fixture creates two recruiting requests before GH-00003
        assert_eq!(summary.total_diagnoses(), 3);
        assert_eq!(summary.diagnoses_in(DiagnosisStatus::Decided), 1);
        assert_eq!(summary.diagnoses_in(DiagnosisStatus::Recruiting), 2);
        assert!(summary.orders.contains(&(OrderStatus::Ordered, 1)));
        assert_eq!(summary.applications_under_review, 1);
        assert_eq!(summary.unprovisioned_approvals, 1);
        assert_eq!(summary.pending_inquiries, 0);
        Ok(())
    }
}
