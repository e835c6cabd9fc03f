//! Billing dimensions, filters and cost metrics

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An axis along which costs can be grouped or filtered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    /// Member account of the organization
    LinkedAccount,
    /// Billed service (e.g. "Amazon Elastic Compute Cloud - Compute")
    Service,
    /// Finest-grained usage classification within a service
    UsageType,
}

impl Dimension {
    /// Key understood by the billing API
    pub fn api_key(&self) -> &'static str {
        match self {
            Self::LinkedAccount => "LINKED_ACCOUNT",
            Self::Service => "SERVICE",
            Self::UsageType => "USAGE_TYPE",
        }
    }

    /// Column header for the dimension value in report tables
    pub fn header(&self) -> &'static str {
        match self {
            Self::LinkedAccount => "Account ID",
            Self::Service => "Service",
            Self::UsageType => "Usage Type",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.api_key())
    }
}

/// Equality constraint on one dimension
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DimensionFilter {
    pub dimension: Dimension,
    pub value: String,
}

impl DimensionFilter {
    pub fn new(dimension: Dimension, value: impl Into<String>) -> Self {
        Self {
            dimension,
            value: value.into(),
        }
    }

    /// Restrict to one member account
    pub fn account(account_id: impl Into<String>) -> Self {
        Self::new(Dimension::LinkedAccount, account_id)
    }

    /// Restrict to one service
    pub fn service(service: impl Into<String>) -> Self {
        Self::new(Dimension::Service, service)
    }
}

impl fmt::Display for DimensionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.dimension, self.value)
    }
}

/// Cost metric requested from the billing API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CostMetric {
    /// Upfront and reserved charges spread over their usage period (default)
    #[default]
    AmortizedCost,
    NetAmortizedCost,
    UnblendedCost,
    NetUnblendedCost,
    BlendedCost,
}

impl CostMetric {
    /// Metric name understood by the billing API
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AmortizedCost => "AmortizedCost",
            Self::NetAmortizedCost => "NetAmortizedCost",
            Self::UnblendedCost => "UnblendedCost",
            Self::NetUnblendedCost => "NetUnblendedCost",
            Self::BlendedCost => "BlendedCost",
        }
    }
}

impl fmt::Display for CostMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CostMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "amortizedcost" | "amortized" => Ok(Self::AmortizedCost),
            "netamortizedcost" | "netamortized" => Ok(Self::NetAmortizedCost),
            "unblendedcost" | "unblended" => Ok(Self::UnblendedCost),
            "netunblendedcost" | "netunblended" => Ok(Self::NetUnblendedCost),
            "blendedcost" | "blended" => Ok(Self::BlendedCost),
            _ => Err(format!("Unknown cost metric: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_keys() {
        assert_eq!(Dimension::LinkedAccount.api_key(), "LINKED_ACCOUNT");
        assert_eq!(Dimension::Service.api_key(), "SERVICE");
        assert_eq!(Dimension::UsageType.api_key(), "USAGE_TYPE");
        assert_eq!(Dimension::UsageType.header(), "Usage Type");
    }

    #[test]
    fn test_filter_display() {
        let filter = DimensionFilter::account("123456789012");
        assert_eq!(filter.to_string(), "LINKED_ACCOUNT=123456789012");
    }

    #[test]
    fn test_metric_parse() {
        assert_eq!("AmortizedCost".parse::<CostMetric>(), Ok(CostMetric::AmortizedCost));
        assert_eq!("unblended".parse::<CostMetric>(), Ok(CostMetric::UnblendedCost));
        assert_eq!(
            "net-amortized-cost".parse::<CostMetric>(),
            Ok(CostMetric::NetAmortizedCost)
        );
        assert!("usage_quantity".parse::<CostMetric>().is_err());
    }

    #[test]
    fn test_metric_round_trips_through_display() {
        for metric in [
            CostMetric::AmortizedCost,
            CostMetric::NetAmortizedCost,
            CostMetric::UnblendedCost,
            CostMetric::NetUnblendedCost,
            CostMetric::BlendedCost,
        ] {
            assert_eq!(metric.to_string().parse::<CostMetric>(), Ok(metric));
        }
    }
}
