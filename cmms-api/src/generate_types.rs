//! TypeScript type generation module.
//!
//! Exports TypeScript definitions for the API's request and response types
//! so a browser front end can share them. Runs as a test.

#[cfg(test)]
mod tests {
    use std::{env, path::Path};

    use ts_rs::TS;

    #[test]
    fn generate_typescript_types() {
        // CMMS_TS_OUTPUT_DIR wins; otherwise ../ts-bindings
        let output_dir_str = env::var("CMMS_TS_OUTPUT_DIR").unwrap_or_else(|_| {
            let fallback_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/../ts-bindings");
            println!("Using fallback directory: {}", fallback_dir);
            fallback_dir.to_string()
        });

        let output_dir = Path::new(&output_dir_str);
        std::fs::create_dir_all(output_dir).expect("Failed to create output directory");

        // Remove stale bindings so renamed types don't linger
        for entry in std::fs::read_dir(output_dir).expect("Failed to read output directory") {
            let path = entry.expect("Failed to read directory entry").path();
            if path.extension().and_then(|s| s.to_str()) == Some("ts") {
                std::fs::remove_file(&path)
                    .unwrap_or_else(|e| panic!("Failed to remove {:?}: {}", path, e));
            }
        }

        use crate::admin_registry::{ChangeList, ChangeRow, EntityDescriptor, FieldDescriptor, FieldKind};
        use crate::api::{error::ErrorResponse, status::HealthStatus, team::AddMemberRequest};
        use crate::models::*;

        // Users and teams
        User::export_all_to(output_dir).expect("Failed to export User type");
        UserInput::export_all_to(output_dir).expect("Failed to export UserInput type");
        UserUpdate::export_all_to(output_dir).expect("Failed to export UserUpdate type");
        Team::export_all_to(output_dir).expect("Failed to export Team type");
        TeamInput::export_all_to(output_dir).expect("Failed to export TeamInput type");
        TeamUpdate::export_all_to(output_dir).expect("Failed to export TeamUpdate type");
        TeamMember::export_all_to(output_dir).expect("Failed to export TeamMember type");

        // Assets and inventory
        Equipment::export_all_to(output_dir).expect("Failed to export Equipment type");
        EquipmentInput::export_all_to(output_dir).expect("Failed to export EquipmentInput type");
        EquipmentUpdate::export_all_to(output_dir).expect("Failed to export EquipmentUpdate type");
        SparePart::export_all_to(output_dir).expect("Failed to export SparePart type");
        SparePartInput::export_all_to(output_dir).expect("Failed to export SparePartInput type");
        SparePartUpdate::export_all_to(output_dir).expect("Failed to export SparePartUpdate type");
        SpareTransaction::export_all_to(output_dir).expect("Failed to export SpareTransaction type");
        SpareTransactionInput::export_all_to(output_dir)
            .expect("Failed to export SpareTransactionInput type");
        PurchaseRequest::export_all_to(output_dir).expect("Failed to export PurchaseRequest type");
        PurchaseRequestInput::export_all_to(output_dir).expect("Failed to export PurchaseRequestInput type");
        PurchaseRequestUpdate::export_all_to(output_dir)
            .expect("Failed to export PurchaseRequestUpdate type");

        // Maintenance
        MaintenanceSchedule::export_all_to(output_dir).expect("Failed to export MaintenanceSchedule type");
        MaintenanceScheduleInput::export_all_to(output_dir)
            .expect("Failed to export MaintenanceScheduleInput type");
        MaintenanceScheduleUpdate::export_all_to(output_dir)
            .expect("Failed to export MaintenanceScheduleUpdate type");
        WorkOrder::export_all_to(output_dir).expect("Failed to export WorkOrder type");
        WorkOrderInput::export_all_to(output_dir).expect("Failed to export WorkOrderInput type");
        WorkOrderUpdate::export_all_to(output_dir).expect("Failed to export WorkOrderUpdate type");
        PerformanceReport::export_all_to(output_dir).expect("Failed to export PerformanceReport type");
        PerformanceReportInput::export_all_to(output_dir)
            .expect("Failed to export PerformanceReportInput type");
        PerformanceReportUpdate::export_all_to(output_dir)
            .expect("Failed to export PerformanceReportUpdate type");

        // API envelopes and admin metadata
        ErrorResponse::export_all_to(output_dir).expect("Failed to export ErrorResponse type");
        HealthStatus::export_all_to(output_dir).expect("Failed to export HealthStatus type");
        AddMemberRequest::export_all_to(output_dir).expect("Failed to export AddMemberRequest type");
        FieldKind::export_all_to(output_dir).expect("Failed to export FieldKind type");
        FieldDescriptor::export_all_to(output_dir).expect("Failed to export FieldDescriptor type");
        EntityDescriptor::export_all_to(output_dir).expect("Failed to export EntityDescriptor type");
        ChangeRow::export_all_to(output_dir).expect("Failed to export ChangeRow type");
        ChangeList::export_all_to(output_dir).expect("Failed to export ChangeList type");

        assert!(output_dir.join("WorkOrder.ts").exists());
        println!("TypeScript types generated successfully in {:?}", output_dir);
    }
}
