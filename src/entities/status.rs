//! Enumerated values stored in string columns.
//!
//! Each enum is the single canonical representation used for comparisons and
//! transitions. Localised display labels live in [`crate::core::vocabulary`].

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Pipeline status of a diagnosis request.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosisStatus {
    /// The customer named a preferred contractor.
    #[sea_orm(string_value = "DESIGNATED")]
    Designated,
    /// Open for quotations from any partner.
    #[sea_orm(string_value = "RECRUITING")]
    Recruiting,
    /// Quotations are being compared.
    #[sea_orm(string_value = "COMPARING")]
    Comparing,
    /// A quotation was selected and an order exists.
    #[sea_orm(string_value = "DECIDED")]
    Decided,
    /// Withdrawn.
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
}

impl DiagnosisStatus {
    /// `DECIDED` and `CANCELLED` accept no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Decided | Self::Cancelled)
    }
}

/// Construction progress of an order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(24))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Created by contractor selection.
    #[sea_orm(string_value = "ORDERED")]
    Ordered,
    /// Construction under way.
    #[sea_orm(string_value = "IN_PROGRESS")]
    InProgress,
    /// Construction finished; a review link may be issued.
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
    /// The customer submitted a review.
    #[sea_orm(string_value = "REVIEW_COMPLETED")]
    ReviewCompleted,
    /// Abandoned.
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
}

/// Review state of a partner application.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    /// Awaiting an admin decision.
    #[default]
    #[sea_orm(string_value = "UNDER_REVIEW")]
    UnderReview,
    /// Accepted.
    #[sea_orm(string_value = "APPROVED")]
    Approved,
    /// Declined.
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
}

/// Handling state of a customer inquiry.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InquiryStatus {
    /// Not yet handled.
    #[default]
    #[sea_orm(string_value = "PENDING")]
    Pending,
    /// Being handled.
    #[sea_orm(string_value = "IN_PROGRESS")]
    InProgress,
    /// Closed.
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
}

/// Whether a partner is listed publicly.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PartnerDetailStatus {
    /// Shown.
    #[sea_orm(string_value = "ACTIVE")]
    Active,
    /// Hidden.
    #[sea_orm(string_value = "INACTIVE")]
    Inactive,
}

impl PartnerDetailStatus {
    /// The detail status that matches a partner's `is_active` flag.
    #[must_use]
    pub const fn from_visibility(visible: bool) -> Self {
        if visible { Self::Active } else { Self::Inactive }
    }
}

/// Publication state of an editorial column.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum ColumnStatus {
    /// Visible on the public site.
    #[sea_orm(string_value = "published")]
    Published,
    /// Hidden.
    #[sea_orm(string_value = "draft")]
    Draft,
}

/// Administrator privilege level.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdminRole {
    /// Full access.
    #[sea_orm(string_value = "SUPER_ADMIN")]
    SuperAdmin,
    /// Standard administrator.
    #[default]
    #[sea_orm(string_value = "ADMIN")]
    Admin,
    /// Day-to-day operator.
    #[sea_orm(string_value = "OPERATOR")]
    Operator,
}

/// Floor-area bracket reported on a diagnosis request.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(24))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(missing_docs)]
pub enum FloorArea {
    #[sea_orm(string_value = "UNDER_80")]
    Under80,
    #[sea_orm(string_value = "FROM_80_TO_100")]
    From80To100,
    #[sea_orm(string_value = "FROM_101_TO_120")]
    From101To120,
    #[sea_orm(string_value = "FROM_121_TO_140")]
    From121To140,
    #[sea_orm(string_value = "FROM_141_TO_160")]
    From141To160,
    #[sea_orm(string_value = "FROM_161_TO_180")]
    From161To180,
    #[sea_orm(string_value = "FROM_181_TO_200")]
    From181To200,
    #[sea_orm(string_value = "FROM_201_TO_250")]
    From201To250,
    #[sea_orm(string_value = "FROM_251_TO_300")]
    From251To300,
    #[sea_orm(string_value = "FROM_301_TO_500")]
    From301To500,
    #[sea_orm(string_value = "OVER_501")]
    Over501,
}

/// How far along the customer is in planning the work.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(missing_docs)]
pub enum CurrentSituation {
    #[sea_orm(string_value = "MARKET_RESEARCH")]
    MarketResearch,
    #[sea_orm(string_value = "CONSIDERING_CONSTRUCTION")]
    ConsideringConstruction,
    #[sea_orm(string_value = "COMPARING_CONTRACTORS")]
    ComparingContractors,
    #[sea_orm(string_value = "READY_TO_ORDER")]
    ReadyToOrder,
    #[sea_orm(string_value = "CONSTRUCTION_COMPLETED")]
    ConstructionCompleted,
}

/// Kind of work requested.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(missing_docs)]
pub enum ConstructionType {
    #[sea_orm(string_value = "EXTERIOR_PAINTING")]
    ExteriorPainting,
    #[sea_orm(string_value = "ROOF_PAINTING")]
    RoofPainting,
    #[sea_orm(string_value = "EXTERIOR_AND_ROOF")]
    ExteriorAndRoof,
    #[sea_orm(string_value = "PARTIAL_REPAIR")]
    PartialRepair,
    #[sea_orm(string_value = "WATERPROOFING")]
    Waterproofing,
    #[sea_orm(string_value = "SIDING_REPLACEMENT")]
    SidingReplacement,
    #[sea_orm(string_value = "FULL_REPLACEMENT")]
    FullReplacement,
}

/// The 47 prefectures of Japan, stored by romanised name.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[allow(missing_docs)]
pub enum Prefecture {
    #[sea_orm(string_value = "Hokkaido")]
    Hokkaido,
    #[sea_orm(string_value = "Aomori")]
    Aomori,
    #[sea_orm(string_value = "Iwate")]
    Iwate,
    #[sea_orm(string_value = "Miyagi")]
    Miyagi,
    #[sea_orm(string_value = "Akita")]
    Akita,
    #[sea_orm(string_value = "Yamagata")]
    Yamagata,
    #[sea_orm(string_value = "Fukushima")]
    Fukushima,
    #[sea_orm(string_value = "Ibaraki")]
    Ibaraki,
    #[sea_orm(string_value = "Tochigi")]
    Tochigi,
    #[sea_orm(string_value = "Gunma")]
    Gunma,
    #[sea_orm(string_value = "Saitama")]
    Saitama,
    #[sea_orm(string_value = "Chiba")]
    Chiba,
    #[sea_orm(string_value = "Tokyo")]
    Tokyo,
    #[sea_orm(string_value = "Kanagawa")]
    Kanagawa,
    #[sea_orm(string_value = "Niigata")]
    Niigata,
    #[sea_orm(string_value = "Toyama")]
    Toyama,
    #[sea_orm(string_value = "Ishikawa")]
    Ishikawa,
    #[sea_orm(string_value = "Fukui")]
    Fukui,
    #[sea_orm(string_value = "Yamanashi")]
    Yamanashi,
    #[sea_orm(string_value = "Nagano")]
    Nagano,
    #[sea_orm(string_value = "Gifu")]
    Gifu,
    #[sea_orm(string_value = "Shizuoka")]
    Shizuoka,
    #[sea_orm(string_value = "Aichi")]
    Aichi,
    #[sea_orm(string_value = "Mie")]
    Mie,
    #[sea_orm(string_value = "Shiga")]
    Shiga,
    #[sea_orm(string_value = "Kyoto")]
    Kyoto,
    #[sea_orm(string_value = "Osaka")]
    Osaka,
    #[sea_orm(string_value = "Hyogo")]
    Hyogo,
    #[sea_orm(string_value = "Nara")]
    Nara,
    #[sea_orm(string_value = "Wakayama")]
    Wakayama,
    #[sea_orm(string_value = "Tottori")]
    Tottori,
    #[sea_orm(string_value = "Shimane")]
    Shimane,
    #[sea_orm(string_value = "Okayama")]
    Okayama,
    #[sea_orm(string_value = "Hiroshima")]
    Hiroshima,
    #[sea_orm(string_value = "Yamaguchi")]
    Yamaguchi,
    #[sea_orm(string_value = "Tokushima")]
    Tokushima,
    #[sea_orm(string_value = "Kagawa")]
    Kagawa,
    #[sea_orm(string_value = "Ehime")]
    Ehime,
    #[sea_orm(string_value = "Kochi")]
    Kochi,
    #[sea_orm(string_value = "Fukuoka")]
    Fukuoka,
    #[sea_orm(string_value = "Saga")]
    Saga,
    #[sea_orm(string_value = "Nagasaki")]
    Nagasaki,
    #[sea_orm(string_value = "Kumamoto")]
    Kumamoto,
    #[sea_orm(string_value = "Oita")]
    Oita,
    #[sea_orm(string_value = "Miyazaki")]
    Miyazaki,
    #[sea_orm(string_value = "Kagoshima")]
    Kagoshima,
    #[sea_orm(string_value = "Okinawa")]
    Okinawa,
}
