//! HTML fixtures mimicking the registry web UI and search results pages

/// A filing-history page in the item-block markup, one block per
/// (fiscal year, document link) pair, each described as annual accounts.
pub fn filing_history_html(filings: &[(u16, &str)]) -> String {
    let items: String = filings
        .iter()
        .map(|(year, link)| {
            format!(
                r#"<div class="filing-history-item">
                    <h3>Annual accounts made up to 31 March {year}</h3>
                    <time datetime="{year}-06-30">30 June {year}</time>
                    <a href="{link}">View PDF</a>
                </div>"#
            )
        })
        .collect();

    format!(
        r#"<html><body><h1>Filing history</h1>{}</body></html>"#,
        items
    )
}

/// A company detail page carrying the registered office address block
pub fn company_page_html(address: &str) -> String {
    format!(
        r#"<html><body>
            <div id="company-addresses">
                <h2>Registered office address</h2>
                <p>{}</p>
            </div>
        </body></html>"#,
        address
    )
}

/// A search results page with redirect-style result links
pub fn search_results_html(targets: &[&str]) -> String {
    let links: String = targets
        .iter()
        .map(|target| {
            let encoded: String =
                url::form_urlencoded::byte_serialize(target.as_bytes()).collect();
            format!(r#"<a class="result__a" href="/l/?uddg={}&rut=x">{}</a>"#, encoded, target)
        })
        .collect();
    format!("<html><body>{}</body></html>", links)
}

/// A plausible company homepage that passes the business-signal check
/// for the given company name
pub fn business_site_html(company_name: &str) -> String {
    format!(
        r#"<html><head>
            <meta name="description" content="{name} designs and manufactures precision components for UK industry.">
        </head><body>
            <h1>{name}</h1>
            <p>We are a family business offering engineering services and products.</p>
            <a href="/about">About us</a> <a href="/contact">Contact</a>
        </body></html>"#,
        name = company_name
    )
}
