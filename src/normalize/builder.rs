//! Projection of raw statements into [`NormalizedStatement`] view models
//!
//! Building never fails. Each variant reads the field paths of its layout and
//! every absent or malformed value falls back to zero or an empty list, so a
//! broken record only degrades its own view model.

use bigdecimal::BigDecimal;

use crate::amount::MonetaryAmount;
use crate::config::{EngineConfig, SegmentLabels};
use crate::normalize::ranking::TopNSelector;
use crate::normalize::raw::Field;
use crate::schema::{self, SchemaVariant};
use crate::types::*;

/// Generic segment fields with the legacy spellings accepted for each
pub const SEGMENT_FIELDS: [(&str, [&str; 3]); 5] = [
    ("campo_a", ["campo_a", "campoa", "CampoA"]),
    ("campo_b", ["campo_b", "campob", "CampoB"]),
    ("campo_c", ["campo_c", "campoc", "CampoC"]),
    ("campo_d", ["campo_d", "campod", "CampoD"]),
    ("campo_e", ["campo_e", "campoe", "CampoE"]),
];

const TAX_ID_KEYS: &[&str] = &["cpf_cnpj", "cpf", "cnpj"];

/// Builds normalized statements from raw payloads
#[derive(Debug, Clone, Default)]
pub struct ViewModelBuilder {
    labels: SegmentLabels,
    selector: TopNSelector,
}

impl ViewModelBuilder {
    /// Create a builder from engine configuration
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            labels: config.segment_labels.clone(),
            selector: TopNSelector::new(config.top_n, config.ranking),
        }
    }

    /// Create a builder with default ranking and the given label table
    pub fn with_labels(labels: SegmentLabels) -> Self {
        Self {
            labels,
            selector: TopNSelector::default(),
        }
    }

    pub fn labels(&self) -> &SegmentLabels {
        &self.labels
    }

    /// Normalize one raw statement
    pub fn build(&self, raw: &RawStatement) -> NormalizedStatement {
        let variant = raw.variant();
        let root = Field::root(&raw.payload);
        let credits_node = root.get("creditos");
        let debits_node = root.get("debitos");

        let mut statement = NormalizedStatement {
            id: raw.id.clone(),
            variant,
            bank: raw.bank.trim().to_string(),
            segment_code: schema::normalize_segment(raw.segment_code.as_deref()).map(str::to_string),
            title_holder: metadata_or(raw.title_holder.as_deref(), root.get("titular")),
            tax_id: metadata_or(raw.tax_id.as_deref(), root.first_of(TAX_ID_KEYS)),
            period: read_period(root.get("periodo")),
            credits: Credits {
                total: credits_node.get("total").amount(),
                categories: read_categories(credits_node.get("tipos")),
                ..Credits::default()
            },
            debits: Debits {
                total: debits_node.get("total").amount(),
                categories: read_categories(debits_node.get("tipos")),
                ..Debits::default()
            },
            declared_income: root.get("renda_mensal").amount(),
            declared_revenue: root.get("faturamento_mensal").amount(),
            spouse: read_related_party(root.get("conjuge")),
            partner: read_related_party(root.get("socio_diretor")),
            city: root.get("cidade").text().and_then(first_sentence),
            deposit_locations: read_locations(root),
            suspected_crimes: root.get("possiveis_crimes").strings(),
            notes: root.get("notas").strings(),
            final_remarks: root.get("informacoes_finais").strings(),
            ..NormalizedStatement::default()
        };

        match variant {
            SchemaVariant::BradescoSegment41 => self.apply_bradesco_details(&mut statement, root),
            SchemaVariant::GenericSegmented => {
                statement.segment_fields = self.read_segment_fields(root);
            }
            SchemaVariant::BancoDoBrasil | SchemaVariant::Unclassified => {}
        }

        let payee_keys: &[&str] = match variant {
            SchemaVariant::BancoDoBrasil => &["principais_destinatarios", "principais_favorecidos"],
            _ => &["principais_favorecidos", "principais_destinatarios"],
        };
        statement.top_depositors = self.selector.select(
            read_counterparties(credits_node.get("principais_depositantes")),
            "depositor",
        );
        statement.top_payees = self
            .selector
            .select(read_counterparties(debits_node.first_of(payee_keys)), "payee");

        statement.balance = &statement.credits.total - &statement.debits.total;
        statement.average_daily_movement = average_daily_movement(&statement);

        log::debug!(
            "Built statement {} ({}): credits {} debits {} depositors {} payees {}",
            statement.id,
            statement.variant,
            statement.credits.total,
            statement.debits.total,
            statement.top_depositors.len(),
            statement.top_payees.len()
        );

        statement
    }

    /// Normalize a batch; each record is built independently
    pub fn build_all(&self, raws: &[RawStatement]) -> Vec<NormalizedStatement> {
        raws.iter().map(|raw| self.build(raw)).collect()
    }

    fn apply_bradesco_details(&self, statement: &mut NormalizedStatement, root: Field<'_>) {
        let credits_node = root.get("creditos");
        let debits_node = root.get("debitos");
        let deposits = credits_node.get("depositos");
        let payments = debits_node.get("pagamentos");

        statement.credits.deposits = DepositBreakdown {
            total: deposits.get("total").amount(),
            count: deposits.get("quantidade").count(),
            check: read_channel(deposits.get("cheque")),
            cash: read_channel(deposits.get("especie")),
        };
        statement.credits.transfers = read_transfers(credits_node.get("transferencias"));
        statement.debits.payments = PaymentBreakdown {
            total: payments.get("total").amount(),
            count: payments.get("quantidade").count(),
            collection: payments.get("cobranca").amount(),
        };
        statement.debits.transfers = read_transfers(debits_node.get("transferencias"));

        statement.risk_indicators = root
            .get("resumo_financeiro")
            .get("indicadores_risco")
            .strings();
        statement.suspicious_activities = root.get("atividades_suspeitas").strings();
        statement.company_affiliations = root.get("vinculos_empresariais").strings();
        statement.bill_payments = self
            .selector
            .select(read_bill_payments(root.get("boletos")), "bill payment");
    }

    fn read_segment_fields(&self, root: Field<'_>) -> Vec<LabeledAmount> {
        SEGMENT_FIELDS
            .iter()
            .filter_map(|(field, aliases)| {
                let amount = root.first_of(aliases).amount();
                if amount.is_zero() {
                    return None;
                }
                Some(LabeledAmount {
                    field: field.to_string(),
                    label: self.labels.label_for(field),
                    amount,
                })
            })
            .collect()
    }
}

/// Read the declared value shown in statement listings (`valor_total`,
/// falling back to the first segment field)
pub fn declared_value(raw: &RawStatement) -> MonetaryAmount {
    let root = Field::root(&raw.payload);
    let aliases = SEGMENT_FIELDS[0].1;
    match root.get("valor_total") {
        field if field.is_present() => field.amount(),
        _ => root.first_of(&aliases).amount(),
    }
}

fn metadata_or(metadata: Option<&str>, fallback: Field<'_>) -> String {
    metadata
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .or_else(|| fallback.text())
        .unwrap_or_default()
}

fn read_period(node: Field<'_>) -> Period {
    Period {
        start: node.get("inicio").text(),
        end: node.get("fim").text(),
    }
}

fn read_categories(node: Field<'_>) -> Vec<CategoryBreakdown> {
    node.items()
        .map(|item| CategoryBreakdown {
            kind: item.get("tipo").text_or_default(),
            count: item.get("quantidade").count(),
            amount: item.get("valor").amount(),
        })
        .collect()
}

fn read_counterparties(node: Field<'_>) -> Vec<Counterparty> {
    node.items()
        .map(|item| {
            Counterparty::new(
                item.get("nome").text_or_default(),
                item.first_of(TAX_ID_KEYS).text_or_default(),
                item.get("valor").amount(),
                item.get("quantidade").count(),
            )
        })
        .collect()
}

fn read_bill_payments(node: Field<'_>) -> Vec<Counterparty> {
    node.items()
        .map(|item| {
            Counterparty::new(
                item.first_of(&["nome_sacado", "nome"]).text_or_default(),
                item.first_of(&["cpf_cnpj_sacado", "cpf_cnpj"]).text_or_default(),
                item.get("valor").amount(),
                item.get("quantidade").count(),
            )
        })
        .collect()
}

fn read_related_party(node: Field<'_>) -> Option<RelatedParty> {
    let name = node.get("nome").text()?;
    Some(RelatedParty {
        name,
        tax_id: node.first_of(TAX_ID_KEYS).text_or_default(),
    })
}

fn read_channel(node: Field<'_>) -> ChannelAmount {
    ChannelAmount {
        amount: node.get("valor").amount(),
        count: node.get("quantidade").count(),
    }
}

fn read_transfers(node: Field<'_>) -> TransferBreakdown {
    let kinds = node.get("tipos");
    TransferBreakdown {
        total: node.get("total").amount(),
        count: node.get("quantidade").count(),
        ted: kinds.get("TED").count(),
        doc: kinds.get("DOC").count(),
        pix: kinds.get("PIX").count(),
        other: kinds.get("OUTROS").count(),
    }
}

fn read_locations(root: Field<'_>) -> Vec<String> {
    let locations = root.get("locais_depositos").strings();
    if !locations.is_empty() {
        return locations;
    }
    root.get("creditos").get("depositos").get("locais").strings()
}

fn first_sentence(text: String) -> Option<String> {
    let sentence = text.split('.').next().unwrap_or_default().trim();
    if sentence.is_empty() {
        None
    } else {
        Some(sentence.to_string())
    }
}

fn average_daily_movement(statement: &NormalizedStatement) -> MonetaryAmount {
    match statement.period.days() {
        Some(days) if days > 0 => {
            let volume = statement.total_volume().into_decimal();
            MonetaryAmount::new(volume / BigDecimal::from(days))
        }
        _ => {
            if statement.period.start.is_some() || statement.period.end.is_some() {
                log::debug!(
                    "Statement {} period {:?} gives no day count",
                    statement.id,
                    statement.period
                );
            }
            MonetaryAmount::zero()
        }
    }
}
