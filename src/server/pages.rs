//! HTML for the listing page. Every interpolated value goes through [`escape_html`].

use crate::data::catalog::Book;

const PAGE_HEAD: &str = r#"<!doctype html>
<html lang="pt-BR">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width,initial-scale=1" />
  <title>Biblioteca</title>
  <style>
    body { font-family: Arial, sans-serif; max-width: 720px; margin: 24px auto; padding: 0 12px; }
    table { border-collapse: collapse; width: 100%; margin: 14px 0; }
    th, td { border-bottom: 1px solid #ddd; padding: 6px 8px; text-align: left; }
    .card { border: 1px solid #ddd; border-radius: 8px; padding: 14px; margin: 14px 0; }
    label { display:block; margin: 8px 0 4px; font-weight: 600; }
    input, select { width: 100%; padding: 8px; box-sizing: border-box; }
    button { margin-top: 12px; padding: 8px 14px; }
  </style>
</head>
<body>
  <h1>Livros disponíveis</h1>
"#;

const PAGE_TAIL: &str = "</body>\n</html>\n";

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn index_page(books: &[Book]) -> String {
    let mut html = String::from(PAGE_HEAD);

    if books.is_empty() {
        html.push_str("  <p class=\"empty\">Nenhum livro encontrado.</p>\n");
    } else {
        html.push_str("  <table>\n    <thead><tr><th>Nome</th><th>Autor</th></tr></thead>\n    <tbody>\n");
        for book in books {
            html.push_str(&format!(
                "      <tr class=\"book\"><td>{}</td><td>{}</td></tr>\n",
                escape_html(&book.name),
                escape_html(&book.author)
            ));
        }
        html.push_str("    </tbody>\n  </table>\n");
    }

    html.push_str(
        "  <form class=\"card\" method=\"post\" action=\"/reservar\">\n    <strong>Reservar</strong>\n    \
         <label for=\"aluno\">Aluno</label>\n    <input id=\"aluno\" name=\"aluno\" required />\n    \
         <label for=\"livro\">Livro</label>\n    <select id=\"livro\" name=\"livro\">\n",
    );
    for book in books {
        let name = escape_html(&book.name);
        html.push_str(&format!("      <option value=\"{name}\">{name}</option>\n"));
    }
    html.push_str("    </select>\n    <button type=\"submit\">Reservar</button>\n  </form>\n");

    html.push_str(PAGE_TAIL);
    html
}
