use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240201_000001_create_users_tables::Migration),
            Box::new(m20240201_000002_create_clubs_tables::Migration),
            Box::new(m20240201_000003_create_parts_catalog_table::Migration),
            Box::new(m20240201_000004_create_inventory_tables::Migration),
            Box::new(m20240201_000005_create_maintenance_tables::Migration),
            Box::new(m20240201_000006_create_procurement_tables::Migration),
            Box::new(m20240201_000007_create_work_log_tables::Migration),
            Box::new(m20240201_000008_create_refresh_tokens_table::Migration),
        ]
    }
}

mod m20240201_000001_create_users_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240201_000001_create_users_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Users::UserId)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Users::Phone).string().not_null().unique_key())
                        .col(ColumnDef::new(Users::Email).string().null())
                        .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                        .col(ColumnDef::new(Users::Role).string().not_null())
                        .col(ColumnDef::new(Users::AccountType).string().not_null())
                        .col(
                            ColumnDef::new(Users::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Users::IsVerified)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(Users::RegistrationDate).date().not_null())
                        .col(
                            ColumnDef::new(Users::LastModified)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(MechanicProfiles::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(MechanicProfiles::ProfileId)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(MechanicProfiles::UserId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(MechanicProfiles::FullName).string().not_null())
                        .col(ColumnDef::new(MechanicProfiles::BirthDate).date().null())
                        .col(
                            ColumnDef::new(MechanicProfiles::TotalExperienceYears)
                                .integer()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(MechanicProfiles::BowlingExperienceYears)
                                .integer()
                                .null(),
                        )
                        .col(ColumnDef::new(MechanicProfiles::Skills).string().null())
                        .col(
                            ColumnDef::new(MechanicProfiles::IsDataVerified)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(MechanicProfiles::VerificationDate)
                                .date()
                                .null(),
                        )
                        .col(ColumnDef::new(MechanicProfiles::Rating).double().null())
                        .col(ColumnDef::new(MechanicProfiles::CreatedAt).date().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(OwnerProfiles::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(OwnerProfiles::OwnerId)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(OwnerProfiles::UserId).big_integer().not_null())
                        .col(ColumnDef::new(OwnerProfiles::Inn).string().null())
                        .col(ColumnDef::new(OwnerProfiles::LegalName).string().null())
                        .col(ColumnDef::new(OwnerProfiles::ContactPerson).string().null())
                        .col(ColumnDef::new(OwnerProfiles::ContactPhone).string().null())
                        .col(ColumnDef::new(OwnerProfiles::ContactEmail).string().null())
                        .col(
                            ColumnDef::new(OwnerProfiles::IsDataVerified)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(OwnerProfiles::VerificationDate).date().null())
                        .col(ColumnDef::new(OwnerProfiles::CreatedAt).date().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ManagerProfiles::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ManagerProfiles::ManagerId)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(ManagerProfiles::UserId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ManagerProfiles::ClubId).big_integer().null())
                        .col(ColumnDef::new(ManagerProfiles::FullName).string().not_null())
                        .col(ColumnDef::new(ManagerProfiles::ContactPhone).string().null())
                        .col(ColumnDef::new(ManagerProfiles::ContactEmail).string().null())
                        .col(
                            ColumnDef::new(ManagerProfiles::IsDataVerified)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(ManagerProfiles::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ManagerProfiles::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(OwnerProfiles::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(MechanicProfiles::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await?;
            Ok(())
        }
    }

    #[derive(Iden)]
    enum Users {
        Table,
        UserId,
        Phone,
        Email,
        PasswordHash,
        Role,
        AccountType,
        IsActive,
        IsVerified,
        RegistrationDate,
        LastModified,
    }

    #[derive(Iden)]
    enum MechanicProfiles {
        Table,
        ProfileId,
        UserId,
        FullName,
        BirthDate,
        TotalExperienceYears,
        BowlingExperienceYears,
        Skills,
        IsDataVerified,
        VerificationDate,
        Rating,
        CreatedAt,
    }

    #[derive(Iden)]
    enum OwnerProfiles {
        Table,
        OwnerId,
        UserId,
        Inn,
        LegalName,
        ContactPerson,
        ContactPhone,
        ContactEmail,
        IsDataVerified,
        VerificationDate,
        CreatedAt,
    }

    #[derive(Iden)]
    enum ManagerProfiles {
        Table,
        ManagerId,
        UserId,
        ClubId,
        FullName,
        ContactPhone,
        ContactEmail,
        IsDataVerified,
        CreatedAt,
    }
}

mod m20240201_000002_create_clubs_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240201_000002_create_clubs_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(BowlingClubs::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(BowlingClubs::ClubId)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(BowlingClubs::OwnerId).big_integer().null())
                        .col(ColumnDef::new(BowlingClubs::Name).string().not_null())
                        .col(ColumnDef::new(BowlingClubs::Address).string().null())
                        .col(
                            ColumnDef::new(BowlingClubs::LanesCount)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(BowlingClubs::ContactPhone).string().null())
                        .col(ColumnDef::new(BowlingClubs::ContactEmail).string().null())
                        .col(
                            ColumnDef::new(BowlingClubs::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(BowlingClubs::IsVerified)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(BowlingClubs::VerificationDate)
                                .date()
                                .null(),
                        )
                        .col(ColumnDef::new(BowlingClubs::CreatedAt).date().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ClubStaff::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ClubStaff::StaffId)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(ClubStaff::ClubId).big_integer().not_null())
                        .col(ColumnDef::new(ClubStaff::UserId).big_integer().not_null())
                        .col(ColumnDef::new(ClubStaff::Role).string().not_null())
                        .col(
                            ColumnDef::new(ClubStaff::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(ClubStaff::AssignedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ClubStaff::AssignedBy).big_integer().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_club_staff_club_user")
                        .table(ClubStaff::Table)
                        .col(ClubStaff::ClubId)
                        .col(ClubStaff::UserId)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ClubStaff::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(BowlingClubs::Table).to_owned())
                .await?;
            Ok(())
        }
    }

    #[derive(Iden)]
    enum BowlingClubs {
        Table,
        ClubId,
        OwnerId,
        Name,
        Address,
        LanesCount,
        ContactPhone,
        ContactEmail,
        IsActive,
        IsVerified,
        VerificationDate,
        CreatedAt,
    }

    #[derive(Iden)]
    enum ClubStaff {
        Table,
        StaffId,
        ClubId,
        UserId,
        Role,
        IsActive,
        AssignedAt,
        AssignedBy,
    }
}

mod m20240201_000003_create_parts_catalog_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240201_000003_create_parts_catalog_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PartsCatalog::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PartsCatalog::CatalogId)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(PartsCatalog::CatalogNumber)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(PartsCatalog::OfficialName).string().null())
                        .col(ColumnDef::new(PartsCatalog::CommonName).string().null())
                        .col(ColumnDef::new(PartsCatalog::Description).string().null())
                        .col(ColumnDef::new(PartsCatalog::Unit).string().null())
                        .col(
                            ColumnDef::new(PartsCatalog::IsUnique)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .to_owned(),
                )
                .await?;
            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PartsCatalog::Table).to_owned())
                .await?;
            Ok(())
        }
    }

    #[derive(Iden)]
    enum PartsCatalog {
        Table,
        CatalogId,
        CatalogNumber,
        OfficialName,
        CommonName,
        Description,
        Unit,
        IsUnique,
    }
}

mod m20240201_000004_create_inventory_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240201_000004_create_inventory_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(WarehouseInventory::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(WarehouseInventory::InventoryId)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(WarehouseInventory::WarehouseId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(WarehouseInventory::CatalogId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(WarehouseInventory::Quantity)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(WarehouseInventory::ReservedQuantity)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(WarehouseInventory::LocationReference)
                                .string()
                                .null(),
                        )
                        .col(ColumnDef::new(WarehouseInventory::CellCode).string().null())
                        .col(ColumnDef::new(WarehouseInventory::ShelfCode).string().null())
                        .col(
                            ColumnDef::new(WarehouseInventory::LaneNumber)
                                .integer()
                                .null(),
                        )
                        .col(ColumnDef::new(WarehouseInventory::LastChecked).date().null())
                        .col(ColumnDef::new(WarehouseInventory::Notes).string().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_inventory_warehouse_catalog")
                        .table(WarehouseInventory::Table)
                        .col(WarehouseInventory::WarehouseId)
                        .col(WarehouseInventory::CatalogId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PersonalWarehouses::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PersonalWarehouses::WarehouseId)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(PersonalWarehouses::MechanicProfileId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PersonalWarehouses::Name).string().not_null())
                        .col(
                            ColumnDef::new(PersonalWarehouses::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(PersonalWarehouses::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PersonalWarehouses::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(WarehouseInventory::Table).to_owned())
                .await?;
            Ok(())
        }
    }

    #[derive(Iden)]
    enum WarehouseInventory {
        Table,
        InventoryId,
        WarehouseId,
        CatalogId,
        Quantity,
        ReservedQuantity,
        LocationReference,
        CellCode,
        ShelfCode,
        LaneNumber,
        LastChecked,
        Notes,
    }

    #[derive(Iden)]
    enum PersonalWarehouses {
        Table,
        WarehouseId,
        MechanicProfileId,
        Name,
        IsActive,
        CreatedAt,
    }
}

mod m20240201_000005_create_maintenance_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240201_000005_create_maintenance_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(MaintenanceRequests::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(MaintenanceRequests::RequestId)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(MaintenanceRequests::ClubId).big_integer().null())
                        .col(ColumnDef::new(MaintenanceRequests::LaneNumber).integer().null())
                        .col(
                            ColumnDef::new(MaintenanceRequests::MechanicId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MaintenanceRequests::RequestDate)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MaintenanceRequests::CompletionDate)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(ColumnDef::new(MaintenanceRequests::Status).string().not_null())
                        .col(ColumnDef::new(MaintenanceRequests::ManagerNotes).string().null())
                        .col(
                            ColumnDef::new(MaintenanceRequests::ManagerDecisionDate)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(MaintenanceRequests::RequestReason)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MaintenanceRequests::PublishedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_maintenance_requests_club")
                        .table(MaintenanceRequests::Table)
                        .col(MaintenanceRequests::ClubId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(RequestParts::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(RequestParts::PartId)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(RequestParts::RequestId).big_integer().not_null())
                        .col(ColumnDef::new(RequestParts::CatalogNumber).string().not_null())
                        .col(ColumnDef::new(RequestParts::PartName).string().not_null())
                        .col(ColumnDef::new(RequestParts::Quantity).integer().not_null())
                        .col(ColumnDef::new(RequestParts::Status).string().null())
                        .col(ColumnDef::new(RequestParts::CatalogId).big_integer().null())
                        .col(ColumnDef::new(RequestParts::InventoryId).big_integer().null())
                        .col(ColumnDef::new(RequestParts::WarehouseId).big_integer().null())
                        .col(
                            ColumnDef::new(RequestParts::InventoryLocation)
                                .string()
                                .null(),
                        )
                        .col(ColumnDef::new(RequestParts::IsAvailable).boolean().null())
                        .col(
                            ColumnDef::new(RequestParts::AcceptedQuantity)
                                .integer()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(RequestParts::AcceptanceComment)
                                .string()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(RequestParts::AcceptanceDate)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(ColumnDef::new(RequestParts::RejectionReason).string().null())
                        .col(ColumnDef::new(RequestParts::SupplierId).big_integer().null())
                        .col(
                            ColumnDef::new(RequestParts::PurchaseOrderId)
                                .big_integer()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(RequestParts::OrderDate)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(RequestParts::DeliveryDate)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(RequestParts::IssueDate)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(RequestParts::HelpRequested)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_request_parts_request")
                        .table(RequestParts::Table)
                        .col(RequestParts::RequestId)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(RequestParts::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(MaintenanceRequests::Table).to_owned())
                .await?;
            Ok(())
        }
    }

    #[derive(Iden)]
    enum MaintenanceRequests {
        Table,
        RequestId,
        ClubId,
        LaneNumber,
        MechanicId,
        RequestDate,
        CompletionDate,
        Status,
        ManagerNotes,
        ManagerDecisionDate,
        RequestReason,
        PublishedAt,
    }

    #[derive(Iden)]
    enum RequestParts {
        Table,
        PartId,
        RequestId,
        CatalogNumber,
        PartName,
        Quantity,
        Status,
        CatalogId,
        InventoryId,
        WarehouseId,
        InventoryLocation,
        IsAvailable,
        AcceptedQuantity,
        AcceptanceComment,
        AcceptanceDate,
        RejectionReason,
        SupplierId,
        PurchaseOrderId,
        OrderDate,
        DeliveryDate,
        IssueDate,
        HelpRequested,
    }
}

mod m20240201_000006_create_procurement_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240201_000006_create_procurement_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Suppliers::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Suppliers::SupplierId)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Suppliers::Inn).string().not_null())
                        .col(ColumnDef::new(Suppliers::LegalName).string().null())
                        .col(ColumnDef::new(Suppliers::ContactPerson).string().null())
                        .col(ColumnDef::new(Suppliers::ContactPhone).string().null())
                        .col(ColumnDef::new(Suppliers::ContactEmail).string().null())
                        .col(ColumnDef::new(Suppliers::Rating).double().null())
                        .col(
                            ColumnDef::new(Suppliers::IsVerified)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Suppliers::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Suppliers::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PurchaseOrders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PurchaseOrders::OrderId)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::MaintenanceRequestId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PurchaseOrders::SupplierId).big_integer().null())
                        .col(ColumnDef::new(PurchaseOrders::Status).string().not_null())
                        .col(
                            ColumnDef::new(PurchaseOrders::OrderDate)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::ExpectedDeliveryDate)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::ActualDeliveryDate)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(SupplierReviews::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SupplierReviews::ReviewId)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(SupplierReviews::PurchaseOrderId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(SupplierReviews::SupplierId).big_integer().null())
                        .col(ColumnDef::new(SupplierReviews::ClubId).big_integer().null())
                        .col(ColumnDef::new(SupplierReviews::UserId).big_integer().null())
                        .col(ColumnDef::new(SupplierReviews::Rating).integer().null())
                        .col(ColumnDef::new(SupplierReviews::Comment).string().null())
                        .col(
                            ColumnDef::new(SupplierReviews::ReviewDate)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SupplierReviews::IsComplaint)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(SupplierReviews::ComplaintStatus)
                                .string()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(SupplierReviews::ComplaintResolved)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(SupplierReviews::ComplaintTitle)
                                .string()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(SupplierReviews::ResolutionNotes)
                                .string()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(SupplierReviews::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(PurchaseOrders::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Suppliers::Table).to_owned())
                .await?;
            Ok(())
        }
    }

    #[derive(Iden)]
    enum Suppliers {
        Table,
        SupplierId,
        Inn,
        LegalName,
        ContactPerson,
        ContactPhone,
        ContactEmail,
        Rating,
        IsVerified,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(Iden)]
    enum PurchaseOrders {
        Table,
        OrderId,
        MaintenanceRequestId,
        SupplierId,
        Status,
        OrderDate,
        ExpectedDeliveryDate,
        ActualDeliveryDate,
    }

    #[derive(Iden)]
    enum SupplierReviews {
        Table,
        ReviewId,
        PurchaseOrderId,
        SupplierId,
        ClubId,
        UserId,
        Rating,
        Comment,
        ReviewDate,
        IsComplaint,
        ComplaintStatus,
        ComplaintResolved,
        ComplaintTitle,
        ResolutionNotes,
    }
}

mod m20240201_000007_create_work_log_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240201_000007_create_work_log_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(WorkLogs::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(WorkLogs::LogId)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(WorkLogs::MaintenanceRequestId)
                                .big_integer()
                                .null(),
                        )
                        .col(ColumnDef::new(WorkLogs::ClubId).big_integer().null())
                        .col(ColumnDef::new(WorkLogs::LaneNumber).integer().null())
                        .col(ColumnDef::new(WorkLogs::MechanicId).big_integer().null())
                        .col(ColumnDef::new(WorkLogs::Status).string().not_null())
                        .col(ColumnDef::new(WorkLogs::WorkType).string().not_null())
                        .col(
                            ColumnDef::new(WorkLogs::ProblemDescription)
                                .string()
                                .null(),
                        )
                        .col(ColumnDef::new(WorkLogs::WorkPerformed).string().null())
                        .col(
                            ColumnDef::new(WorkLogs::SolutionDescription)
                                .string()
                                .null(),
                        )
                        .col(ColumnDef::new(WorkLogs::EstimatedHours).double().null())
                        .col(ColumnDef::new(WorkLogs::ActualHours).double().null())
                        .col(ColumnDef::new(WorkLogs::LaborCost).double().null())
                        .col(ColumnDef::new(WorkLogs::TotalPartsCost).double().null())
                        .col(ColumnDef::new(WorkLogs::TotalCost).double().null())
                        .col(
                            ColumnDef::new(WorkLogs::Priority)
                                .integer()
                                .not_null()
                                .default(3),
                        )
                        .col(ColumnDef::new(WorkLogs::QualityRating).integer().null())
                        .col(
                            ColumnDef::new(WorkLogs::CreatedDate)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(WorkLogs::StartedDate)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(WorkLogs::CompletedDate)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(ColumnDef::new(WorkLogs::CreatedBy).big_integer().null())
                        .col(ColumnDef::new(WorkLogs::ModifiedBy).big_integer().null())
                        .col(
                            ColumnDef::new(WorkLogs::ModifiedDate)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(WorkLogs::IsManualEdit)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(WorkLogs::ManualEditReason)
                                .string()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(WorkLogStatusHistory::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(WorkLogStatusHistory::HistoryId)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(WorkLogStatusHistory::WorkLogId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(WorkLogStatusHistory::PreviousStatus)
                                .string()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(WorkLogStatusHistory::NewStatus)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(WorkLogStatusHistory::ChangedBy)
                                .big_integer()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(WorkLogStatusHistory::ChangedDate)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(WorkLogStatusHistory::Reason).string().null())
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(WorkLogStatusHistory::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(WorkLogs::Table).to_owned())
                .await?;
            Ok(())
        }
    }

    #[derive(Iden)]
    enum WorkLogs {
        Table,
        LogId,
        MaintenanceRequestId,
        ClubId,
        LaneNumber,
        MechanicId,
        Status,
        WorkType,
        ProblemDescription,
        WorkPerformed,
        SolutionDescription,
        EstimatedHours,
        ActualHours,
        LaborCost,
        TotalPartsCost,
        TotalCost,
        Priority,
        QualityRating,
        CreatedDate,
        StartedDate,
        CompletedDate,
        CreatedBy,
        ModifiedBy,
        ModifiedDate,
        IsManualEdit,
        ManualEditReason,
    }

    #[derive(Iden)]
    enum WorkLogStatusHistory {
        Table,
        HistoryId,
        WorkLogId,
        PreviousStatus,
        NewStatus,
        ChangedBy,
        ChangedDate,
        Reason,
    }
}

mod m20240201_000008_create_refresh_tokens_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240201_000008_create_refresh_tokens_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(RefreshTokens::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(RefreshTokens::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(RefreshTokens::UserId).big_integer().not_null())
                        .col(
                            ColumnDef::new(RefreshTokens::Jti)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(RefreshTokens::ExpiresAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RefreshTokens::Revoked)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(RefreshTokens::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;
            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(RefreshTokens::Table).to_owned())
                .await?;
            Ok(())
        }
    }

    #[derive(Iden)]
    enum RefreshTokens {
        Table,
        Id,
        UserId,
        Jti,
        ExpiresAt,
        Revoked,
        CreatedAt,
    }
}
