use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use backoffice_core::{DomainError, Entity, Intent, Money, StatusIntent, record_id};
use backoffice_sales::OrderId;

record_id!(
    /// Payment transaction identifier.
    TransactionId
);

/// Transaction status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Authorized,
    Captured,
    Settled,
    Failed,
    Refunded,
    Disputed,
}

impl StatusIntent for TransactionStatus {
    fn intent(&self) -> Intent {
        match self {
            TransactionStatus::Pending | TransactionStatus::Authorized => Intent::Warning,
            TransactionStatus::Captured => Intent::Info,
            TransactionStatus::Settled => Intent::Success,
            TransactionStatus::Failed | TransactionStatus::Disputed => Intent::Danger,
            TransactionStatus::Refunded => Intent::Neutral,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Authorized => "authorized",
            TransactionStatus::Captured => "captured",
            TransactionStatus::Settled => "settled",
            TransactionStatus::Failed => "failed",
            TransactionStatus::Refunded => "refunded",
            TransactionStatus::Disputed => "disputed",
        }
    }
}

impl core::str::FromStr for TransactionStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TransactionStatus::Pending),
            "authorized" => Ok(TransactionStatus::Authorized),
            "captured" => Ok(TransactionStatus::Captured),
            "settled" => Ok(TransactionStatus::Settled),
            "failed" => Ok(TransactionStatus::Failed),
            "refunded" => Ok(TransactionStatus::Refunded),
            "disputed" => Ok(TransactionStatus::Disputed),
            other => Err(DomainError::validation(format!(
                "unknown transaction status: {other}"
            ))),
        }
    }
}

/// Gross/fee/net breakdown, all in minor units of `currency`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionAmount {
    pub gross: i64,
    pub fee: i64,
    pub net: i64,
    pub currency: String,
}

impl TransactionAmount {
    pub fn gross_money(&self) -> Money {
        Money::new(self.gross, self.currency.clone())
    }

    pub fn net_money(&self) -> Money {
        Money::new(self.net, self.currency.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Refund {
    pub amount: i64,
    #[serde(default)]
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dispute {
    pub reason: String,
    pub amount: i64,
    pub opened_at: DateTime<Utc>,
}

/// Provider transaction (card capture, wallet payment, bank transfer...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    #[serde(default)]
    pub order_id: Option<OrderId>,
    pub provider: String,
    pub method: String,
    pub amount: TransactionAmount,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub authorized_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub captured_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub settled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub refunds: Vec<Refund>,
    #[serde(default)]
    pub dispute: Option<Dispute>,
}

impl Transaction {
    /// Sum of all refunds issued against this transaction.
    pub fn refunded_total(&self) -> i64 {
        self.refunds.iter().map(|r| r.amount).sum()
    }

    pub fn is_disputed(&self) -> bool {
        self.dispute.is_some() || self.status == TransactionStatus::Disputed
    }
}

impl Entity for Transaction {
    type Id = TransactionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
