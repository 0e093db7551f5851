use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
	Low,
	Medium,
	High,
	Critical,
}
impl Priority {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Low => "low",
			Self::Medium => "medium",
			Self::High => "high",
			Self::Critical => "critical",
		}
	}
}

/// One static topic record. Keywords are matched against the lower-cased query, so they are
/// declared in lower case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnowledgeEntry {
	pub key: &'static str,
	pub keywords: &'static [&'static str],
	pub category: &'static str,
	pub priority: Priority,
	pub response: &'static str,
	pub documentation: &'static [&'static str],
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KnowledgeError {
	#[error("Knowledge entry {key} must declare at least one keyword.")]
	EmptyKeywords { key: &'static str },
	#[error("Knowledge entry {key} must declare at least one documentation link.")]
	EmptyDocumentation { key: &'static str },
	#[error("Knowledge entry key {key} is declared more than once.")]
	DuplicateKey { key: &'static str },
}

/// Ordered rule list. Declaration order is the match priority: the first entry with any
/// keyword hit wins.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
	entries: Vec<KnowledgeEntry>,
}
impl KnowledgeBase {
	pub fn new(entries: Vec<KnowledgeEntry>) -> Result<Self, KnowledgeError> {
		for (index, entry) in entries.iter().enumerate() {
			if entry.keywords.is_empty() {
				return Err(KnowledgeError::EmptyKeywords { key: entry.key });
			}
			if entry.documentation.is_empty() {
				return Err(KnowledgeError::EmptyDocumentation { key: entry.key });
			}
			if entries[..index].iter().any(|earlier| earlier.key == entry.key) {
				return Err(KnowledgeError::DuplicateKey { key: entry.key });
			}
		}

		Ok(Self { entries })
	}

	pub fn builtin() -> Self {
		Self { entries: BUILTIN_ENTRIES.to_vec() }
	}

	pub fn entries(&self) -> &[KnowledgeEntry] {
		&self.entries
	}

	pub fn get(&self, key: &str) -> Option<&KnowledgeEntry> {
		self.entries.iter().find(|entry| entry.key == key)
	}
}
impl Default for KnowledgeBase {
	fn default() -> Self {
		Self::builtin()
	}
}

pub const BUILTIN_ENTRIES: [KnowledgeEntry; 4] = [
	KnowledgeEntry {
		key: "produto-nao-aparece",
		keywords: &[
			"produto",
			"não aparece",
			"sumiu",
			"invisível",
			"não mostra",
			"não está",
			"não encontro",
		],
		category: "Catálogo",
		priority: Priority::High,
		response: r#"🔍 **Produto não aparece no site**

**Verificações imediatas:**
1. Admin VTEX → Catálogo → Produtos e SKUs
2. Verificar se produto está "Ativo"
3. Estoque & Entrega → Gerenciar Inventário (qty > 0)
4. Preços → Lista de Preços (preço ativo)
5. Forçar reindexação se necessário

**APIs para diagnóstico:**
`GET /api/catalog/pvt/product/{id}`
`GET /api/logistics/pvt/inventory/skus/{skuId}`
`GET /api/pricing/prices/{skuId}`

**Tempo estimado:** 15-30 minutos"#,
		documentation: &[
			"https://help.vtex.com/pt/faq/por-que-o-produto-nao-aparece-no-site",
			"https://developers.vtex.com/docs/guides/catalog-api-overview",
		],
	},
	KnowledgeEntry {
		key: "erro-401",
		keywords: &["401", "unauthorized", "não autorizado", "autenticação", "forbidden", "403"],
		category: "APIs & Autenticação",
		priority: Priority::High,
		response: r#"🔐 **Erro 401/403 - Problemas de Autenticação**

**Verificações imediatas:**
1. Headers corretos:
   `X-VTEX-API-AppKey: {seu-app-key}`
   `X-VTEX-API-AppToken: {seu-app-token}`

2. Teste básico:
   `GET /api/license-manager/pvt/accounts`

3. Verificar permissões:
   Admin → Configurações → Perfis de acesso

4. Recriar credenciais:
   Configurações → Gerenciamento de usuários

**Tempo estimado:** 10-20 minutos"#,
		documentation: &[
			"https://developers.vtex.com/docs/guides/api-authentication-using-application-keys",
		],
	},
	KnowledgeEntry {
		key: "checkout-problemas",
		keywords: &["checkout", "pagamento", "finalizar", "compra", "carrinho", "payment"],
		category: "Checkout & Pagamentos",
		priority: Priority::Critical,
		response: r#"💳 **Problemas no Checkout - PRIORIDADE CRÍTICA**

**Verificações urgentes:**
1. Admin → Pedidos → Transações
2. Localizar transação com erro
3. Analisar logs detalhados
4. Configurações → Pagamentos
5. Testar meios de pagamento
6. Simular compra completa

**APIs para análise:**
`GET /api/checkout/pub/orders/{orderId}`
`GET /api/payments/pvt/transactions/{transactionId}`

**Resolver IMEDIATAMENTE - impacta vendas!**"#,
		documentation: &[
			"https://help.vtex.com/pt/tutorial/verificar-erros-ou-problemas-em-uma-transacao",
			"https://developers.vtex.com/docs/guides/checkout-api-overview",
		],
	},
	KnowledgeEntry {
		key: "estoque-problemas",
		keywords: &["estoque", "inventory", "disponibilidade", "quantidade", "warehouse"],
		category: "Estoque & Logística",
		priority: Priority::Medium,
		response: r#"📦 **Problemas de Estoque**

**Checklist rápido:**
1. Estoque & Entrega → Gerenciar Inventário
2. Buscar SKU específico
3. Verificar quantidade disponível
4. Status do warehouse (ativo/inativo)
5. Analisar movimentações recentes
6. Verificar reservas em andamento

**Tempo estimado:** 10-15 minutos"#,
		documentation: &["https://help.vtex.com/pt/tutorial/gerenciar-inventario"],
	},
];
