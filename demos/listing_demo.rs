//! End-to-end walk through the listing view
//!
//! This example demonstrates:
//! - Loading listings and managers through a `PropertySource`
//! - Filtering, multi-key sorting and pagination
//! - Saving and restoring per-user preferences in files (with a legacy document)
//! - Rendering a contract template and a printable report

use estate::prelude::*;
use serde_json::json;

fn sample_properties() -> Result<Vec<Property>> {
    let raw = json!([
        {"id": "1", "name": "Gangnam Cafe", "status": "A", "industrySector": "food", "address": "Seoul Gangnam-gu",
         "deposit": "30,000", "premium": 15000, "monthlyRent": 250, "area": 24, "managerId": "u1",
         "createdAt": "2024-03-02T09:00:00+09:00", "isFavorite": true},
        {"id": "2", "name": "Mapo Bakery", "status": "B", "industrySector": "food", "address": "Seoul Mapo-gu",
         "deposit": 10000, "premium": "8,000", "monthlyRent": 120, "area": "15.5", "managerName": "Kim",
         "createdAt": "2024-03-02T18:00:00+09:00"},
        {"id": "3", "name": "Busan Gym", "status": "A", "industrySector": "sports", "address": "Busan Haeundae-gu",
         "deposit": 50000, "premium": 0, "monthlyIncome": 900, "area": 120, "manager": "Park",
         "createdAt": "2024-02-20"},
        {"id": "4", "name": "Incheon Bar", "status": "C", "industrySector": "food",
         "deposit": "n/a", "currentFloor": 2, "managerId": "u2", "createdAt": "2024-03-05"}
    ]);
    Ok(serde_json::from_value(raw)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    println!("🏠 Estate Listing Demo");
    println!("======================\n");

    let mut config = ListingConfig::default_config();
    config.fetch.limit = Some(2000);
    config.preferences_dir = Some(
        std::env::temp_dir()
            .join("estate-demo-prefs")
            .to_string_lossy()
            .into_owned(),
    );

    // Load records through the source, as the view would from the backend
    let source = InMemoryPropertySource::new(
        sample_properties()?,
        ManagerDirectory::new(vec![Manager::new("u1", "Kim"), Manager::new("u2", "Lee")]),
    );
    let loader = ListingLoader::new(source);
    loader
        .reload_all(&FetchScope::from_config(&config.fetch).company("Acme"))
        .await?;
    let records = loader.records()?;
    let directory = loader.directory()?;
    println!("✅ Loaded {} listings, {} managers\n", records.len(), directory.managers().len());

    // A user with an old settings document
    let kv = FileKeyValueStore::from_config(&config)?;
    kv.set(
        "property_settings_u1",
        &json!({
            "sortConfig": {"key": "monthlyIncome", "direction": "desc"},
            "activeFilters": ["status", "monthlyIncome"],
            "statusFilter": ["A", "B"]
        })
        .to_string(),
    )
    .await?;
    let store = KeyValuePreferenceStore::new(kv, &config);
    let prefs = store.load("u1").await?;
    println!("📋 Restored sort rules: {:?}", prefs.sort_rules);

    let mut view = ListingView::from_preferences(&prefs, &config);
    view.update_sort(|sort| {
        sort.add_rule(SortKey::Name);
    });
    view.update_filters(|f| f.managers = vec!["u1".to_string()]);
    view.resize_column("name", 260);
    view.set_page(3);

    let mut page = view.run(&records, &directory);
    if view.clamp_page(page.total_pages) {
        page = view.run(&records, &directory);
    }
    println!(
        "🔎 {} matching listings, page {}/{}",
        page.total_count,
        page.pagination.page,
        page.total_pages
    );
    for (i, property) in page.items.iter().enumerate() {
        println!(
            "   {}. {} (manager: {}, total: {})",
            view.page().row_number(i),
            property.name_or_empty(),
            directory.display_name(property),
            property.number(NumericKey::Total)
        );
    }

    store.save("u1", &view.to_preferences()).await?;
    println!("\n💾 Saved preferences at schema version 2\n");

    // Printable report over every match
    let all = filter_and_sort(&records, view.filters(), view.sort(), &directory);
    let report = ListingReport::new(
        "매물 목록",
        ["no", "name", "address", "deposit", "premium", "totalPrice", "manager"]
            .iter()
            .map(|c| c.to_string())
            .collect(),
    );
    let html = report.render(&all, &directory, chrono::Local::now().date_naive())?;
    println!("🖨️  Report: {} bytes of HTML", html.len());

    // Contract document
    let template: ContractTemplate = serde_json::from_value(json!({
        "id": "receipt",
        "name": "Deposit receipt",
        "category": "receipt",
        "formSchema": [
            {"key": "payer", "label": "납부자", "type": "text", "required": true},
            {"key": "amount", "label": "금액", "type": "money"}
        ],
        "htmlTemplate": "<p>{{payer}} paid {{amount_fmt}} won</p><!-- GENUINE_PAGE_BREAK --><p>Signed: {{signature}}</p>"
    }))?;
    let common = json!({"payer": "Kim"}).as_object().cloned().unwrap_or_default();
    let form = json!({"amount": 5000000}).as_object().cloned().unwrap_or_default();
    let data = effective_data(&common, &form);
    for (i, page) in template.render(&data, &config.template).iter().enumerate() {
        println!("📄 Page {}: {}", i + 1, page);
    }

    Ok(())
}
