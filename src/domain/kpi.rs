// KPI slot domain model
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KpiSlotId(pub u64);

impl fmt::Display for KpiSlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "k{}", self.0)
    }
}

/// Summary metrics a KPI tile can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KpiType {
    Revenue,
    Orders,
    AverageTicket,
    LaborCostPct,
    FoodCostPct,
    InventoryValue,
    OpenPurchaseOrders,
    ActiveEmployees,
}

impl KpiType {
    pub const ALL: [KpiType; 8] = [
        KpiType::Revenue,
        KpiType::Orders,
        KpiType::AverageTicket,
        KpiType::LaborCostPct,
        KpiType::FoodCostPct,
        KpiType::InventoryValue,
        KpiType::OpenPurchaseOrders,
        KpiType::ActiveEmployees,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiSlot {
    pub id: KpiSlotId,
    pub kpi_type: KpiType,
    pub position: usize,
}

impl KpiSlot {
    pub fn new(id: KpiSlotId, kpi_type: KpiType, position: usize) -> Self {
        Self {
            id,
            kpi_type,
            position,
        }
    }
}
