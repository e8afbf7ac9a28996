//! Normalizing a single raw statement

use serde_json::json;
use statement_core::{EngineConfig, MonetaryAmount, RawStatement, ViewModelBuilder};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🏦 Statement Core - Normalize Statement Example\n");

    // 1. Amounts arrive in mixed notations
    println!("🔢 Parsing amounts...");
    for raw in ["50.000,00", "1234.56", "10,5", "R$ 1.500,00", "undefined", "abc"] {
        let amount = MonetaryAmount::parse(raw);
        println!("  {:>14} → {} (R$ {})", format!("{:?}", raw), amount, amount.to_br_string());
    }
    println!();

    // 2. A Bradesco segment 41 document
    let raw = RawStatement::new(
        "demo-1".to_string(),
        "Banco Bradesco S.A.".to_string(),
        Some("41".to_string()),
        json!({
            "titular": "JOSE DA SILVA",
            "cpf": "123.456.789-00",
            "periodo": {"inicio": "01.01.2024", "fim": "31.01.2024"},
            "creditos": {
                "total": "150.000,00",
                "depositos": {
                    "total": "60.000,00",
                    "quantidade": 12,
                    "cheque": {"valor": "10.000,00", "quantidade": 2},
                    "especie": {"valor": "50.000,00", "quantidade": 10}
                },
                "principais_depositantes": [
                    {"nome": "COMERCIO ABC", "cpf_cnpj": "12.345.678/0001-90", "valor": "80.000,00", "quantidade": "08"},
                    {"nome": "FULANO DE TAL", "cpf_cnpj": "987.654.321-00", "valor": "40.000,00", "quantidade": "04"}
                ]
            },
            "debitos": {
                "total": "120.000,00",
                "principais_favorecidos": [
                    {"nome": "IMOBILIARIA XYZ", "cpf_cnpj": "11.222.333/0001-44", "valor": "60.000,00", "quantidade": "06"}
                ]
            },
            "possiveis_crimes": ["Lavagem de dinheiro"],
            "resumo_financeiro": {"indicadores_risco": ["Depósitos em espécie fracionados"]}
        }),
    );

    let config = EngineConfig::default().with_segment_label("campo_a", "Valor total");
    config.validate()?;
    let builder = ViewModelBuilder::new(&config);
    let statement = builder.build(&raw);

    println!("📄 {} ({})", statement.title_holder, statement.variant);
    println!("  Credits:  R$ {}", statement.credits.total.to_br_string());
    println!("  Debits:   R$ {}", statement.debits.total.to_br_string());
    println!("  Balance:  R$ {}", statement.balance.to_br_string());
    println!(
        "  Average daily movement: R$ {}",
        statement.average_daily_movement.to_br_string()
    );
    println!(
        "  Cash deposits: R$ {} in {} deposits",
        statement.credits.deposits.cash.amount.to_br_string(),
        statement.credits.deposits.cash.count
    );
    println!();

    println!("👥 Top depositors");
    for depositor in &statement.top_depositors {
        println!(
            "  ✓ {} ({}): R$ {} in {} transactions",
            depositor.name,
            depositor.tax_id,
            depositor.amount.to_br_string(),
            depositor.transaction_count
        );
    }
    println!();

    println!("⚠️  Risk indicators");
    for indicator in &statement.risk_indicators {
        println!("  • {}", indicator);
    }
    for crime in &statement.suspected_crimes {
        println!("  • Suspected: {}", crime);
    }

    // 3. The view model is plain serde data
    println!("\n🧾 JSON view model:");
    println!("{}", serde_json::to_string_pretty(&statement)?);

    Ok(())
}
