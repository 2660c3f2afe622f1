//! Shared HTML scaffold for transactional emails.
//!
//! Inline styles only; email clients ignore stylesheets. The palette mirrors
//! the front-end theme.

const PRIMARY: &str = "#1b9476";
const TEXT: &str = "#124660";
const MUTED: &str = "#334155";
const BG: &str = "#f4ebd6";

/// Wrap body HTML in the branded email frame.
pub fn wrap(title: &str, body: &str) -> String {
    format!(
        "<div style=\"background:{BG};padding:24px;font-family:Arial,Helvetica,sans-serif;\">\
           <div style=\"max-width:560px;margin:0 auto;background:#ffffff;border-radius:8px;\
                        padding:32px;color:{MUTED};\">\
             <h2 style=\"color:{TEXT};margin-top:0;\">{title}</h2>\
             {body}\
             <p style=\"color:#64748b;font-size:12px;margin-bottom:0;\">\
               Localiz — local deals, swaps and donations.</p>\
           </div>\
         </div>"
    )
}

/// A call-to-action button linking to `href`.
pub fn button(label: &str, href: &str) -> String {
    format!(
        "<p style=\"text-align:center;margin:24px 0;\">\
           <a href=\"{href}\" style=\"background:{PRIMARY};color:#ffffff;padding:12px 24px;\
              border-radius:6px;text-decoration:none;display:inline-block;\">{label}</a>\
         </p>"
    )
}
