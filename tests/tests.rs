use std::sync::atomic::{AtomicUsize, Ordering};

use autoparts_catalogue::catalogue::{dump_table, TABLES};
use autoparts_catalogue::db::schema_sql;
use autoparts_catalogue::prelude::*;

static DATABASE_ID: AtomicUsize = AtomicUsize::new(0);

fn memory_url(name: &str) -> String {
    let id = DATABASE_ID.fetch_add(1, Ordering::SeqCst);
    format!("sqlite:file:{name}_{id}?mode=memory&cache=shared")
}

#[allow(dead_code)]
async fn setup_databases(name: &str) -> Databases {
    let settings = Settings::new()
        .with_database(
            DEFAULT_DB,
            DatabaseSettings::new(memory_url(&format!("{name}_default"))).max_connections(1),
        )
        .with_database(
            CATALOGUE_DB,
            DatabaseSettings::new(memory_url(&format!("{name}_catalogue"))).max_connections(1),
        );
    let databases = Databases::connect(&settings)
        .await
        .expect("failed to init databases");
    databases.migrate().await.expect("failed to migrate");
    databases
}

async fn part(
    databases: &Databases,
    title: &str,
    article: &str,
    manufacturer: Option<&Manufacturer>,
) -> Autoparts {
    Autoparts::objects(databases)
        .unwrap()
        .save(&Autoparts {
            title: title.to_string(),
            article: article.to_string(),
            url: format!("https://shop.example.com/{article}"),
            manufacturer_id: manufacturer.and_then(|m| m.id),
            ..Default::default()
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn test_migrate_is_idempotent() {
    let databases = setup_databases("migrate").await;
    assert!(databases.migrate().await.is_ok());

    let categories = Category::objects(&databases).unwrap();
    assert_eq!(categories.alias(), CATALOGUE_DB);
    assert_eq!(categories.count().await.unwrap(), 0);

    // nothing is routed to the default database
    let default = Manager::<Category>::using(&databases, DEFAULT_DB).unwrap();
    assert!(default.count().await.is_err());
}

#[tokio::test]
async fn test_unconfigured_alias_is_an_error() {
    let settings = Settings::new().with_database(
        DEFAULT_DB,
        DatabaseSettings::new(memory_url("routing")).max_connections(1),
    );
    let databases = Databases::connect(&settings).await.unwrap();

    assert!(matches!(
        Autoparts::objects(&databases),
        Err(Error::UnknownDatabase(alias)) if alias == CATALOGUE_DB
    ));
    assert!(matches!(
        Manager::<Car>::using(&databases, "replica"),
        Err(Error::UnknownDatabase(_))
    ));
    assert!(matches!(
        databases.migrate().await,
        Err(Error::UnknownDatabase(_))
    ));
}

#[tokio::test]
async fn test_category_tree() {
    let databases = setup_databases("category").await;
    let categories = Category::objects(&databases).unwrap();
    let conn = categories.conn();

    let engine = categories
        .save(&Category {
            name: "Engine".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    let brakes = categories
        .save(&Category {
            name: "Brakes".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    for name in ["Pads", "Discs"] {
        categories
            .create(kwargs!(name = name, parent_id = brakes.id))
            .await
            .unwrap();
    }

    let names = |rows: Vec<Category>| rows.into_iter().map(|c| c.name).collect::<Vec<_>>();
    assert_eq!(names(categories.all().await.unwrap()), ["Brakes", "Discs", "Engine", "Pads"]);
    assert_eq!(names(Category::roots(conn).await.unwrap()), ["Brakes", "Engine"]);
    assert_eq!(names(brakes.children(conn).await.unwrap()), ["Discs", "Pads"]);
    assert_eq!(
        names(categories.filter(kwargs!(parent_id != None::<i32>)).await.unwrap()),
        ["Discs", "Pads"]
    );

    let pads = categories.get(kwargs!(name = "Pads")).await.unwrap().unwrap();
    assert_eq!(pads.parent(conn).await.unwrap().unwrap().name, "Brakes");
    assert!(engine.parent(conn).await.unwrap().is_none());
    assert_eq!(pads.is_active, True);

    let duplicate = categories
        .save(&Category {
            name: "Engine".to_string(),
            ..Default::default()
        })
        .await;
    assert!(matches!(duplicate, Err(Error::Database(_))));

    categories.delete(&brakes).await.unwrap();
    assert_eq!(names(categories.all().await.unwrap()), ["Engine"]);
}

#[tokio::test]
async fn test_autoparts_crud() {
    let databases = setup_databases("autoparts").await;
    let parts = Autoparts::objects(&databases).unwrap();
    let conn = parts.conn();

    let bosch = Manufacturer::objects(&databases)
        .unwrap()
        .save(&Manufacturer {
            name: Some("BOSCH".to_string()),
            related_name: Some("Bosch".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(bosch.to_string(), "Bosch");

    let filter = part(&databases, "Oil filter", "F 026 407 006", Some(&bosch)).await;
    let pads = part(&databases, "Brake pads", "0 986 494 524", Some(&bosch)).await;
    assert!(filter.id.is_some());
    assert!(!filter.updated_at.is_empty());

    let titles = |rows: Vec<Autoparts>| rows.into_iter().map(|p| p.title).collect::<Vec<_>>();
    assert_eq!(titles(parts.all().await.unwrap()), ["Brake pads", "Oil filter"]);
    assert_eq!(titles(bosch.products(conn).await.unwrap()), ["Brake pads", "Oil filter"]);
    assert_eq!(
        filter.describe(conn).await.unwrap(),
        "BOSCH : F 026 407 006 - Oil filter"
    );
    assert_eq!(
        filter.manufacturer(conn).await.unwrap().unwrap().id,
        bosch.id
    );
    assert!(filter.category(conn).await.unwrap().is_none());

    let mut renamed = pads.clone();
    renamed.title = "Disc brake pads".to_string();
    parts.update(&renamed).await.unwrap();
    let stored = parts.get_by_pk(pads.id.unwrap()).await.unwrap();
    assert_eq!(stored.title, "Disc brake pads");
    assert_eq!(
        stored.get_absolute_url().unwrap(),
        format!("/catalogue/products/{}/", pads.id.unwrap())
    );

    let article = "F 026 407 006";
    assert!(parts.exists(kwargs!(article == article)).await.unwrap());
    assert_eq!(parts.count().await.unwrap(), 2);

    parts.delete(&filter).await.unwrap();
    assert!(matches!(
        parts.get_by_pk(filter.id.unwrap()).await,
        Err(Error::DoesNotExist("Autoparts"))
    ));

    // deleting the manufacturer cascades to its parts
    Manufacturer::objects(&databases)
        .unwrap()
        .delete(&bosch)
        .await
        .unwrap();
    assert_eq!(parts.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_validation_blocks_writes() {
    let databases = setup_databases("validation").await;
    let parts = Autoparts::objects(&databases).unwrap();

    let invalid = Autoparts {
        title: "Spark plug".to_string(),
        article: "FR7DC".to_string(),
        url: "not a url".to_string(),
        ..Default::default()
    };
    assert!(matches!(
        parts.save(&invalid).await,
        Err(Error::Validation { model: "Autoparts", field: "url", .. })
    ));
    assert_eq!(parts.count().await.unwrap(), 0);

    let characteristics = Characteristic::objects(&databases).unwrap();
    let too_long = Characteristic {
        raw_name: "x".repeat(151),
        ..Default::default()
    };
    assert!(matches!(
        characteristics.save(&too_long).await,
        Err(Error::Validation { field: "_name", .. })
    ));
}

#[tokio::test]
async fn test_create_and_set_are_validated() {
    let databases = setup_databases("validated_writes").await;
    let categories = Category::objects(&databases).unwrap();
    let conn = categories.conn();

    assert!(matches!(
        categories.create(kwargs!(name = "x".repeat(300))).await,
        Err(Error::Validation { model: "Category", field: "name", .. })
    ));
    assert_eq!(categories.count().await.unwrap(), 0);

    categories.create(kwargs!(name = "Filters")).await.unwrap();
    let filters = categories.get(kwargs!(name = "Filters")).await.unwrap().unwrap();
    assert!(matches!(
        Category::set(filters.id.unwrap(), kwargs!(name = "y".repeat(999)), conn).await,
        Err(Error::Validation { field: "name", .. })
    ));
    assert_eq!(
        categories.get_by_pk(filters.id.unwrap()).await.unwrap().name,
        "Filters"
    );

    assert!(matches!(
        Autoparts::create(
            kwargs!(title = "Pads", article = "P1", url = "pads.html"),
            conn
        )
        .await,
        Err(Error::Validation { field: "url", .. })
    ));
    assert!(matches!(
        Car::create(kwargs!(model_id = 1, power_hp = -5), conn).await,
        Err(Error::Validation { field: "power_hp", .. })
    ));
}

#[tokio::test]
async fn test_similar_parts_ranking() {
    let databases = setup_databases("similar").await;
    let conn = SimilarPart::objects(&databases).unwrap().conn();

    let primary = part(&databases, "Air filter", "C 30 005", None).await;
    let low = part(&databases, "Air filter A", "LX 1780", None).await;
    let high = part(&databases, "Air filter B", "ADV182224", None).await;
    let tie = part(&databases, "Air filter C", "1 457 433 031", None).await;

    let link = primary.add_similar(&low, 1, conn).await.unwrap();
    assert_eq!(link.ranking, 1);
    primary.add_similar(&high, 10, conn).await.unwrap();
    primary.add_similar(&tie, 1, conn).await.unwrap();

    let articles = primary
        .similar_products(conn)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.article)
        .collect::<Vec<_>>();
    assert_eq!(articles, ["ADV182224", "LX 1780", "1 457 433 031"]);
    assert!(low.similar_products(conn).await.unwrap().is_empty());

    assert_eq!(link.describe(conn).await.unwrap(), "C 30 005 -> LX 1780");

    let rankings = SimilarPart::all(conn)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.ranking)
        .collect::<Vec<_>>();
    assert_eq!(rankings, [10, 1, 1]);

    assert!(matches!(
        primary.add_similar(&low, 5, conn).await,
        Err(Error::Database(_))
    ));
    assert!(matches!(
        primary.add_similar(&high, -3, conn).await,
        Err(Error::Validation { field: "ranking", .. })
    ));

    Autoparts::delete(&high, conn).await.unwrap();
    assert_eq!(SimilarPart::count(conn).await.unwrap(), 2);
}

#[tokio::test]
async fn test_characteristic_values() {
    let databases = setup_databases("characteristics").await;
    let characteristics = Characteristic::objects(&databases).unwrap();
    let conn = characteristics.conn();

    let width = characteristics
        .save(&Characteristic {
            raw_name: "width_mm".to_string(),
            replacement_name: Some("Width".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    let height = characteristics
        .save(&Characteristic {
            raw_name: "Height".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(width.name(), "Width");
    assert_eq!(height.source.as_deref(), Some(""));

    let filter = part(&databases, "Oil filter", "OC 90", None).await;
    let first = filter.set_characteristic(&width, "76 mm", conn).await.unwrap();
    let second = filter.set_characteristic(&width, "80 mm", conn).await.unwrap();
    filter.set_characteristic(&height, "142 mm", conn).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.characteristic_value, "80 mm");
    assert_eq!(filter.characteristic_values(conn).await.unwrap().len(), 2);
    assert_eq!(width.values(conn).await.unwrap().len(), 1);

    let names = filter
        .characteristics(conn)
        .await
        .unwrap()
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>();
    assert_eq!(names, ["Width", "Height"]);

    let id = second.id.unwrap();
    assert_eq!(
        second.describe(conn).await.unwrap(),
        format!("{id}. Product OC 90; Width: 80 mm")
    );
    assert_eq!(
        second.get_absolute_url().unwrap(),
        format!("/catalogue/product-characteristics/{id}/")
    );

    let duplicate = CharacteristicValue::create(
        kwargs!(
            characteristic_value = "1",
            product_id = filter.id,
            characteristic_id = width.id
        ),
        conn,
    )
    .await;
    assert!(matches!(duplicate, Err(Error::Database(_))));

    Characteristic::delete(&width, conn).await.unwrap();
    assert_eq!(filter.characteristic_values(conn).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_vehicle_compatibility() {
    let databases = setup_databases("vehicles").await;
    let conn = Car::objects(&databases).unwrap().conn();

    let vw = ManufacturerCar::objects(&databases)
        .unwrap()
        .save(&ManufacturerCar {
            name: "Volkswagen".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    let golf = ModelCar::objects(&databases)
        .unwrap()
        .save(&ModelCar {
            name: "Golf".to_string(),
            manufacturer_id: vw.id.unwrap(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(golf.manufacturer(conn).await.unwrap().name, "Volkswagen");
    assert_eq!(vw.models(conn).await.unwrap().len(), 1);

    let cars = Car::objects(&databases).unwrap();
    let tdi = cars
        .save(&Car {
            model_id: golf.id.unwrap(),
            car_type: "1.6 TDI".to_string(),
            volume_cm: Some(1598),
            power_kwt: Some(77),
            power_hp: Some(105),
            key: Some("vw-golf-16tdi".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(tdi.to_string(), "1.6 TDI");
    assert_eq!(tdi.model(conn).await.unwrap().name, "Golf");

    let same_type = cars
        .save(&Car {
            model_id: golf.id.unwrap(),
            car_type: "1.6 TDI".to_string(),
            ..Default::default()
        })
        .await;
    assert!(matches!(same_type, Err(Error::Database(_))));

    let pads = part(&databases, "Brake pads", "0 986 494 524", None).await;
    let filter = part(&databases, "Oil filter", "OC 90", None).await;
    tdi.add_part(&pads, conn).await.unwrap();
    tdi.add_part(&pads, conn).await.unwrap();
    tdi.add_part(&filter, conn).await.unwrap();
    assert_eq!(CarPart::count(conn).await.unwrap(), 2);

    let titles = tdi
        .parts(conn)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.title)
        .collect::<Vec<_>>();
    assert_eq!(titles, ["Brake pads", "Oil filter"]);
    assert_eq!(pads.cars(conn).await.unwrap()[0].car_type, "1.6 TDI");
    assert_eq!(golf.cars(conn).await.unwrap().len(), 1);

    tdi.remove_part(&pads, conn).await.unwrap();
    assert!(pads.cars(conn).await.unwrap().is_empty());

    ManufacturerCar::delete(&vw, conn).await.unwrap();
    assert_eq!(Car::count(conn).await.unwrap(), 0);
    assert_eq!(CarPart::count(conn).await.unwrap(), 0);
    assert_eq!(Autoparts::count(conn).await.unwrap(), 2);
}

#[tokio::test]
async fn test_dump_table_as_json() {
    let databases = setup_databases("dump").await;
    let manufacturers = Manufacturer::objects(&databases).unwrap();
    manufacturers
        .create(kwargs!(name = "MANN", related_name = "Mann-Filter"))
        .await
        .unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&dump_table(&databases, "catalogue_manufacturer").await.unwrap())
            .unwrap();
    assert_eq!(json[0]["name"], "MANN");
    assert_eq!(json[0]["related_name"], "Mann-Filter");
    assert_eq!(json[0]["is_active"], 1);

    for table in TABLES {
        assert!(dump_table(&databases, table).await.is_ok(), "{table}");
    }
    assert_eq!(dump_table(&databases, "catalogue_car").await.unwrap(), "[]");
    assert!(matches!(
        dump_table(&databases, "auth_user").await,
        Err(Error::UnknownTable(table)) if table == "auth_user"
    ));
}

#[tokio::test]
async fn test_migrate_single_alias() {
    let settings = Settings::new()
        .with_database(
            DEFAULT_DB,
            DatabaseSettings::new(memory_url("single_default")).max_connections(1),
        )
        .with_database(
            CATALOGUE_DB,
            DatabaseSettings::new(memory_url("single_catalogue")).max_connections(1),
        );
    let databases = Databases::connect(&settings).await.unwrap();

    databases.get(DEFAULT_DB).unwrap().migrate().await.unwrap();
    assert!(Category::objects(&databases).unwrap().count().await.is_err());

    databases.get(CATALOGUE_DB).unwrap().migrate().await.unwrap();
    assert_eq!(Category::objects(&databases).unwrap().count().await.unwrap(), 0);
    assert_eq!(CarPart::objects(&databases).unwrap().count().await.unwrap(), 0);
    assert!(Manager::<Category>::using(&databases, DEFAULT_DB)
        .unwrap()
        .count()
        .await
        .is_err());
}

#[test]
fn test_sqlmigrate_output() {
    let position = |statements: &[String], table: &str| {
        statements
            .iter()
            .position(|s| s.starts_with(&format!("create table if not exists \"{table}\"")))
            .unwrap()
    };
    let sqlite = schema_sql(Backend::Sqlite).unwrap();
    for table in TABLES {
        position(&sqlite, table);
    }
    assert!(position(&sqlite, "catalogue_category") < position(&sqlite, "catalogue_autoparts"));
    assert!(position(&sqlite, "catalogue_autoparts") < position(&sqlite, "catalogue_similarpart"));
    assert!(position(&sqlite, "catalogue_car") < position(&sqlite, "catalogue_car_parts"));

    let mysql = schema_sql(Backend::Mysql).unwrap().join("\n");
    assert!(mysql.contains("`updated_at` varchar(40) default (current_timestamp) not null"));
    assert!(mysql.contains(
        "foreign key (`car_id`) references `catalogue_car`(`id`) on delete cascade"
    ));
    assert!(!mysql.contains("create index"));
}
