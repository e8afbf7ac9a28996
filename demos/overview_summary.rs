//! Overview dashboard over an in-memory statement source

use serde_json::json;
use statement_core::{
    MemoryStatementSource, RawStatement, SchemaVariant, StatementService,
};

fn statements() -> Vec<RawStatement> {
    vec![
        RawStatement::new(
            "bradesco-1".to_string(),
            "Bradesco".to_string(),
            Some("41".to_string()),
            json!({
                "titular": "JOSE DA SILVA",
                "creditos": {"total": "150.000,00", "depositos": {"especie": {"valor": "50.000,00"}}},
                "debitos": {"total": "120.000,00"},
                "locais_depositos": ["Sao Paulo", "Campinas"],
                "resumo_financeiro": {"indicadores_risco": ["Depósitos em espécie elevados"]}
            }),
        ),
        RawStatement::new(
            "bb-1".to_string(),
            "Banco do Brasil".to_string(),
            None,
            json!({
                "titular": "MARIA SOUZA",
                "valor_total": "8.000,00",
                "creditos": {"total": "80.500,10"},
                "debitos": {"total": "70.000,00"},
                "possiveis_crimes": ["Sonegação fiscal"]
            }),
        ),
        RawStatement::new(
            String::new(),
            "Nubank".to_string(),
            Some("42".to_string()),
            json!({"titular": "EMPRESA XPTO", "campo_a": "25.000,00", "campo_b": "1.500,75"}),
        ),
    ]
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("📊 Statement Core - Overview Summary Example\n");

    let source = MemoryStatementSource::with_statements(statements())?;
    let service = StatementService::new(source);

    // 1. Listing
    println!("📋 Statements");
    for row in service.statement_listing().await? {
        println!(
            "  ✓ {:<38} {:<16} {:<16} R$ {}",
            row.id,
            row.title_holder,
            row.bank,
            row.declared_value.to_br_string()
        );
    }
    println!();

    // 2. Overview
    let summary = service.overview().await?;
    println!("📈 Overview of {} statements", summary.count);
    println!("  Total credits: R$ {}", summary.total_credits.to_br_string());
    println!("  Total debits:  R$ {}", summary.total_debits.to_br_string());
    println!("  Balance:       R$ {}", summary.balance.to_br_string());
    println!("  Cash deposits: R$ {}", summary.total_cash_deposits.to_br_string());
    println!(
        "  With risk indicators: {} ({}%)",
        summary.statements_with_risk,
        summary.risk_percentage()
    );
    println!(
        "  With suspected crimes: {} ({}%)",
        summary.statements_with_crimes,
        summary.crime_percentage()
    );
    println!(
        "  Average deposit locations per statement: {}",
        summary.average_locations_per_statement
    );
    println!();

    println!("🏦 Per bank");
    for (bank, breakdown) in &summary.per_bank_breakdown {
        println!(
            "  {:<16} {} statements, R$ {} moved ({}% of volume), R$ {} average",
            bank,
            breakdown.count,
            breakdown.total_volume.to_br_string(),
            summary.bank_share(bank),
            breakdown.average_volume().to_br_string()
        );
    }
    println!();

    // 3. One bank, every segment
    let bradesco = service.bank_overview("bradesco").await?;
    println!(
        "🔎 Bradesco: {} statements, R$ {} moved, {} with risk indicators",
        bradesco.count,
        bradesco.total_volume().to_br_string(),
        bradesco.statements_with_risk
    );

    // 4. One variant only
    let segmented = service
        .variant_overview(SchemaVariant::GenericSegmented)
        .await?;
    println!(
        "🧩 Segmented statements: {}, labelled volume R$ {}",
        segmented.count,
        segmented.total_segment_volume.to_br_string()
    );

    Ok(())
}
