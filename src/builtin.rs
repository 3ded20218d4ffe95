//! Built-in element catalogue.
//!
//! Every store starts from these categories. A library file can add to them
//! or replace individual elements by name.

use crate::element::Element;
use serde_json::{Value, json};
use std::collections::BTreeMap;

/// Category → name → element table.
pub type Catalogue = BTreeMap<String, BTreeMap<String, Element>>;

const FONTS_STYLESHEET: &str = "www.estatistica.pro/wss/fonts?families=SF+Pro,v3|SF+Pro+Icons,v3";

/// Build the built-in catalogue.
pub fn catalogue() -> Catalogue {
    let mut catalogue = Catalogue::new();
    for (category, elements) in [
        ("navegacao", navigation()),
        ("analytics", analytics()),
        ("social", social()),
        ("layout", layout()),
        ("categorias", categories()),
        ("snippets", snippets()),
    ] {
        let table = elements
            .into_iter()
            .map(|(name, value)| (name.to_string(), element(value)))
            .collect();
        catalogue.insert(category.to_string(), table);
    }
    catalogue
}

fn element(value: Value) -> Element {
    match value {
        Value::Object(map) => Element::from_map(map),
        _ => Element::default(),
    }
}

fn navigation() -> Vec<(&'static str, Value)> {
    vec![
        (
            "header_completo",
            json!({
                "description": "Cabeçalho completo com navegação global e local",
                "includes": {
                    "header_global": {
                        "enabled": true,
                        "file": "globalheader.html",
                        "position": "after_body_open",
                        "priority": 1
                    },
                    "local_nav": {
                        "enabled": true,
                        "file": "localnav.html",
                        "position": "after_globalheader",
                        "priority": 2
                    }
                },
                "components": {
                    "globalmessage": {"enabled": true, "lang": "pt-BR", "dir": "ltr"},
                    "globalnav": {
                        "enabled": true,
                        "analytics_region": "global nav",
                        "store_api": "/[storefront]/shop/bag/status"
                    }
                }
            }),
        ),
        (
            "header_simples",
            json!({
                "description": "Cabeçalho simplificado - apenas globalheader, sem navegação adicional",
                "includes": {
                    "header_global": {
                        "enabled": true,
                        "file": "globalheader.html",
                        "position": "after_body_open",
                        "priority": 1
                    }
                },
                // globalnav and globalmessage left out on purpose: they would
                // be rendered twice next to the global header.
                "components": {}
            }),
        ),
        (
            "header_minimalista",
            json!({
                "description": "Sem headers - para landing pages específicas",
                "includes": {"header_global": {"enabled": false}},
                "components": {
                    "globalmessage": {"enabled": false},
                    "globalnav": {"enabled": false}
                }
            }),
        ),
    ]
}

fn analytics() -> Vec<(&'static str, Value)> {
    vec![
        (
            "newsroom_padrao",
            json!({
                "description": "Analytics padrão para artigos de newsroom",
                "analytics": {
                    "s_channel": "newsroom",
                    "s_bucket_0": "applestoreww",
                    "s_bucket_1": "applestoreww",
                    "s_bucket_2": "applestoreww",
                    "track": "Redação - Estatística"
                }
            }),
        ),
        (
            "produto_lancamento",
            json!({
                "description": "Analytics para lançamentos de produtos",
                "analytics": {
                    "s_channel": "newsroom",
                    "s_bucket_0": "applestoreww",
                    "s_bucket_1": "product_launch",
                    "s_bucket_2": "product_launch",
                    "track": "Redação - Estatística - Lançamento",
                    "s_products": "produto-lancamento",
                    "s_events": "event15=o"
                }
            }),
        ),
        (
            "comunicado_imprensa",
            json!({
                "description": "Analytics para comunicados de imprensa",
                "analytics": {
                    "s_channel": "newsroom",
                    "s_bucket_0": "applestoreww",
                    "s_bucket_1": "press_release",
                    "s_bucket_2": "press_release",
                    "track": "Redação - Estatística - Comunicado",
                    "s_events": "event20=o"
                }
            }),
        ),
    ]
}

fn social() -> Vec<(&'static str, Value)> {
    vec![
        (
            "twitter_completo",
            json!({
                "description": "Twitter Cards completo com imagem grande",
                "twitter": {
                    "card": "summary_large_image",
                    "site": "@estatisticabr",
                    "creator": "@estatisticabr",
                    "domain": "estatistica.pro"
                }
            }),
        ),
        (
            "twitter_simples",
            json!({
                "description": "Twitter Cards simples",
                "twitter": {
                    "card": "summary",
                    "site": "@estatisticabr",
                    "domain": "estatistica.pro"
                }
            }),
        ),
        (
            "og_artigo",
            json!({
                "description": "Open Graph otimizado para artigos",
                "og": {
                    "type": "article",
                    "site_name": "Redação - Estatística",
                    "locale": "pt_BR",
                    "image": "https://www.estatistica.pro/newsroom/images/default/tile/default.jpg.og.jpg",
                    "image:width": "1200",
                    "image:height": "630",
                    "image:alt": "Redação - Estatística"
                }
            }),
        ),
        (
            "og_produto",
            json!({
                "description": "Open Graph otimizado para páginas de produto",
                "og": {
                    "type": "product",
                    "site_name": "Redação - Estatística",
                    "locale": "pt_BR",
                    "image": "https://www.estatistica.pro/newsroom/images/default/tile/product.jpg.og.jpg",
                    "image:width": "1200",
                    "image:height": "630"
                }
            }),
        ),
    ]
}

fn layout() -> Vec<(&'static str, Value)> {
    vec![
        (
            "artigo_padrao",
            json!({
                "description": "Layout padrão para artigos de newsroom",
                "components": {
                    "globalmessage": {"enabled": true, "lang": "pt-BR", "dir": "ltr"},
                    "article_hero": {"enabled": true, "style": "default"},
                    "article_content": {"enabled": true, "typography": "newsroom"}
                },
                "stylesheets": [FONTS_STYLESHEET, "/newsroom/styles/newsroom-article.css"]
            }),
        ),
        (
            "landing_page",
            json!({
                "description": "Layout para páginas de destino/landing",
                "components": {
                    "hero_banner": {"enabled": true, "style": "full_width", "animation": "fade_in"},
                    "feature_grid": {"enabled": true, "columns": 3, "style": "card"}
                },
                "stylesheets": [FONTS_STYLESHEET, "/newsroom/styles/landing-page.css"]
            }),
        ),
    ]
}

fn categories() -> Vec<(&'static str, Value)> {
    vec![
        (
            "comunicado_imprensa",
            json!({
                "description": "Template completo para comunicados de imprensa",
                "meta_basico": {
                    "category": "COMUNICADO DE IMPRENSA",
                    "category_class": "category_release",
                    "type": "article"
                },
                "analytics": {
                    "s_channel": "newsroom",
                    "s_bucket_1": "press_release",
                    "s_bucket_2": "press_release",
                    "track": "Redação - Estatística - Comunicado"
                },
                "og": {
                    "type": "article",
                    "image": "https://www.estatistica.pro/newsroom/images/press/tile/default.jpg.og.jpg"
                }
            }),
        ),
        (
            "lancamento_produto",
            json!({
                "description": "Template para lançamentos de produtos",
                "meta_basico": {
                    "category": "LANÇAMENTO DE PRODUTO",
                    "category_class": "category_product",
                    "type": "product"
                },
                "analytics": {
                    "s_channel": "newsroom",
                    "s_bucket_1": "product_launch",
                    "s_bucket_2": "product_launch",
                    "track": "Redação - Estatística - Lançamento"
                },
                "components": {"product_showcase": {"enabled": true, "style": "hero"}}
            }),
        ),
        (
            "evento",
            json!({
                "description": "Template para eventos e keynotes",
                "meta_basico": {
                    "category": "EVENTO",
                    "category_class": "category_event",
                    "type": "event"
                },
                "analytics": {
                    "s_channel": "newsroom",
                    "s_bucket_1": "event",
                    "s_bucket_2": "event",
                    "track": "Redação - Estatística - Evento"
                },
                "components": {
                    "event_info": {"enabled": true, "show_date": true, "show_location": true}
                }
            }),
        ),
    ]
}

fn snippets() -> Vec<(&'static str, Value)> {
    vec![
        (
            "disclaimer_padrao",
            json!({
                "description": "Disclaimer padrão para artigos",
                "content": "\n---\n\n**Sobre a Redação - Estatística**\n\n\
A Redação - Estatística é dedicada a fornecer análises precisas e insights valiosos \
sobre tecnologia, dados e inovação. Nossos comunicados refletem nosso compromisso com \
a transparência e qualidade informativa.\n\n\
**Contato para Imprensa:**\n\
- Email: press@estatistica.pro\n\
- Telefone: +55 (11) 1234-5678\n"
            }),
        ),
        (
            "cta_newsletter",
            json!({
                "description": "Call-to-action para newsletter",
                "content": "\n## Mantenha-se Atualizado\n\n\
Inscreva-se em nossa newsletter para receber as últimas análises e insights \
diretamente em seu email.\n\n\
[**Inscrever-se →**](https://www.estatistica.pro/newsletter)\n"
            }),
        ),
        (
            "rodape_social",
            json!({
                "description": "Links de redes sociais para rodapé",
                "content": "\n### Siga-nos nas Redes Sociais\n\n\
- [Twitter](https://twitter.com/estatisticabr)\n\
- [LinkedIn](https://linkedin.com/company/estatistica-pro)\n\
- [YouTube](https://youtube.com/c/estatisticapro)\n"
            }),
        ),
    ]
}
