//! Status vocabulary - code and display label for every enumerated value.
//!
//! The enums in [`crate::entities::status`] are the only representation used for
//! comparisons and transitions. Japanese labels are produced here, at the
//! presentation boundary, and never stored. Lookups on raw strings are total:
//! an unknown value passes through unchanged so new statuses degrade to their
//! raw code instead of failing.

use crate::{
    entities::status::{
        AdminRole, ApplicationStatus, ColumnStatus, ConstructionType, CurrentSituation,
        DiagnosisStatus, FloorArea, InquiryStatus, OrderStatus, PartnerDetailStatus, Prefecture,
    },
    errors::{Error, Result},
};
use sea_orm::{ActiveEnum, Iterable};
use std::borrow::Cow;

/// A closed set of values with a stable code and a display label.
///
/// Codes are the `string_value`s the enums are stored under, so only labels
/// are written out here.
pub trait Vocabulary: Copy + PartialEq + Iterable + ActiveEnum<Value = String> + 'static {
    /// Field name reported in validation errors.
    const FIELD: &'static str;

    /// The stored code, e.g. `DECIDED`.
    fn code(self) -> String {
        self.to_value()
    }

    /// The display label, e.g. `業者決定`.
    fn label(self) -> &'static str;

    /// Looks a value up by its stored code.
    fn from_code(code: &str) -> Option<Self> {
        Self::try_from_value(&code.to_string()).ok()
    }

    /// Looks a value up by its display label.
    fn from_label(label: &str) -> Option<Self> {
        Self::iter().find(|value| value.label() == label)
    }

    /// Accepts either a code or a label; anything else is a validation error.
    fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        Self::from_code(raw)
            .or_else(|| Self::from_label(raw))
            .ok_or_else(|| Error::invalid_value(Self::FIELD, raw))
    }
}

/// Maps a stored code to its label, passing unknown input through unchanged.
#[must_use]
pub fn display_label<T: Vocabulary>(raw: &str) -> &str {
    T::from_code(raw).map_or(raw, |value| value.label())
}

/// Maps a label back to its stored code, passing unknown input through unchanged.
///
/// A value that is already a code is returned as-is.
#[must_use]
pub fn canonical_code<T: Vocabulary>(raw: &str) -> Cow<'_, str> {
    T::from_label(raw).map_or(Cow::Borrowed(raw), |value| Cow::Owned(value.code()))
}

impl Vocabulary for DiagnosisStatus {
    const FIELD: &'static str = "diagnosis status";

    fn label(self) -> &'static str {
        match self {
            Self::Designated => "業者指定",
            Self::Recruiting => "見積もり募集中",
            Self::Comparing => "見積もり比較中",
            Self::Decided => "業者決定",
            Self::Cancelled => "キャンセル",
        }
    }
}

impl Vocabulary for OrderStatus {
    const FIELD: &'static str = "order status";

    fn label(self) -> &'static str {
        match self {
            Self::Ordered => "受注",
            Self::InProgress => "施工中",
            Self::Completed => "施工完了",
            Self::ReviewCompleted => "評価完了",
            Self::Cancelled => "キャンセル",
        }
    }
}

impl Vocabulary for ApplicationStatus {
    const FIELD: &'static str = "application status";

    fn label(self) -> &'static str {
        match self {
            Self::UnderReview => "審査中",
            Self::Approved => "承認",
            Self::Rejected => "却下",
        }
    }
}

impl Vocabulary for InquiryStatus {
    const FIELD: &'static str = "inquiry status";

    fn label(self) -> &'static str {
        match self {
            Self::Pending => "未対応",
            Self::InProgress => "対応中",
            Self::Completed => "対応完了",
        }
    }
}

impl Vocabulary for PartnerDetailStatus {
    const FIELD: &'static str = "partner status";

    fn label(self) -> &'static str {
        match self {
            Self::Active => "表示",
            Self::Inactive => "非表示",
        }
    }
}

impl Vocabulary for ColumnStatus {
    const FIELD: &'static str = "column status";

    fn label(self) -> &'static str {
        match self {
            Self::Published => "表示",
            Self::Draft => "非表示",
        }
    }
}

impl Vocabulary for AdminRole {
    const FIELD: &'static str = "admin role";

    fn label(self) -> &'static str {
        match self {
            Self::SuperAdmin => "スーパー管理者",
            Self::Admin => "管理者",
            Self::Operator => "オペレーター",
        }
    }
}

impl Vocabulary for FloorArea {
    const FIELD: &'static str = "floor area";

    fn label(self) -> &'static str {
        match self {
            Self::Under80 => "80平米未満",
            Self::From80To100 => "80-100平米",
            Self::From101To120 => "101-120平米",
            Self::From121To140 => "121-140平米",
            Self::From141To160 => "141-160平米",
            Self::From161To180 => "161-180平米",
            Self::From181To200 => "181-200平米",
            Self::From201To250 => "201-250平米",
            Self::From251To300 => "251-300平米",
            Self::From301To500 => "301-500平米",
            Self::Over501 => "501平米以上",
        }
    }
}

impl Vocabulary for CurrentSituation {
    const FIELD: &'static str = "current situation";

    fn label(self) -> &'static str {
        match self {
            Self::MarketResearch => "市場調査中",
            Self::ConsideringConstruction => "施工検討中",
            Self::ComparingContractors => "業者比較中",
            Self::ReadyToOrder => "発注準備",
            Self::ConstructionCompleted => "工事完了",
        }
    }
}

impl Vocabulary for ConstructionType {
    const FIELD: &'static str = "construction type";

    fn label(self) -> &'static str {
        match self {
            Self::ExteriorPainting => "外壁塗装",
            Self::RoofPainting => "屋根塗装",
            Self::ExteriorAndRoof => "外壁・屋根塗装",
            Self::PartialRepair => "部分補修",
            Self::Waterproofing => "防水工事",
            Self::SidingReplacement => "サイディング交換",
            Self::FullReplacement => "全面交換",
        }
    }
}

impl Vocabulary for Prefecture {
    const FIELD: &'static str = "prefecture";

    fn label(self) -> &'static str {
        match self {
            Self::Hokkaido => "北海道",
            Self::Aomori => "青森県",
            Self::Iwate => "岩手県",
            Self::Miyagi => "宮城県",
            Self::Akita => "秋田県",
            Self::Yamagata => "山形県",
            Self::Fukushima => "福島県",
            Self::Ibaraki => "茨城県",
            Self::Tochigi => "栃木県",
            Self::Gunma => "群馬県",
            Self::Saitama => "埼玉県",
            Self::Chiba => "千葉県",
            Self::Tokyo => "東京都",
            Self::Kanagawa => "神奈川県",
            Self::Niigata => "新潟県",
            Self::Toyama => "富山県",
            Self::Ishikawa => "石川県",
            Self::Fukui => "福井県",
            Self::Yamanashi => "山梨県",
            Self::Nagano => "長野県",
            Self::Gifu => "岐阜県",
            Self::Shizuoka => "静岡県",
            Self::Aichi => "愛知県",
            Self::Mie => "三重県",
            Self::Shiga => "滋賀県",
            Self::Kyoto => "京都府",
            Self::Osaka => "大阪府",
            Self::Hyogo => "兵庫県",
            Self::Nara => "奈良県",
            Self::Wakayama => "和歌山県",
            Self::Tottori => "鳥取県",
            Self::Shimane => "島根県",
            Self::Okayama => "岡山県",
            Self::Hiroshima => "広島県",
            Self::Yamaguchi => "山口県",
            Self::Tokushima => "徳島県",
            Self::Kagawa => "香川県",
            Self::Ehime => "愛媛県",
            Self::Kochi => "高知県",
            Self::Fukuoka => "福岡県",
            Self::Saga => "佐賀県",
            Self::Nagasaki => "長崎県",
            Self::Kumamoto => "熊本県",
            Self::Oita => "大分県",
            Self::Miyazaki => "宮崎県",
            Self::Kagoshima => "鹿児島県",
            Self::Okinawa => "沖縄県",
        }
    }
}
