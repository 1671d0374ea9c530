//! Sample documents.

/// A dashboard page holding both the Audit Checklist and the
/// Certificates and CTE tab panels in their pre-Card layout.
pub const DASHBOARD: &str = include_str!("../../../test-fixtures/pages/ClientDashboardPage.tsx");

/// Minimal recipe used across crates: wraps `{tab === 'panel'` in a Card
/// and drops a `class="footer"` region.
pub const PANEL_RECIPE: &str = r#"
name = "Panel"
anchor = "{tab === 'panel'"

[open]
token = "<div>"
replacement = "<Card>"

[close]
token = "</div>"
replacement = "</Card>"

[[regions]]
name = "footer"
trigger = 'class="footer"'
"#;

/// A document [`PANEL_RECIPE`] matches.
pub const PANEL: &str = "\
<main>
  {tab === 'panel' && (
    <div>
      <p>body</p>
      <div class=\"footer\">
        <button>Save</button>
      </div>
    </div>
  )}
</main>
";

/// What [`PANEL_RECIPE`] turns [`PANEL`] into.
pub const PANEL_UPDATED: &str = "\
<main>
  {tab === 'panel' && (
    <Card>
      <p>body</p>
    </Card>
  )}
</main>
";
