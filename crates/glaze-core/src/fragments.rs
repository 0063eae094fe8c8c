//! Verbatim text fragments injected by the feature catalog.
//!
//! Style fragments are spliced inside an existing `<style>` block, so they
//! carry no tags of their own. Every fragment ends with a newline.

pub const GRADIENTS_CSS: &str = r#"    /* Glass design system gradients */
    :root {
      --gradient-1: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
      --gradient-2: linear-gradient(135deg, #f093fb 0%, #f5576c 100%);
      --gradient-3: linear-gradient(135deg, #4facfe 0%, #00f2fe 100%);
      --gradient-4: linear-gradient(135deg, #43e97b 0%, #38f9d7 100%);
      --gradient-5: linear-gradient(135deg, #fa709a 0%, #fee140 100%);
      --gradient-6: linear-gradient(135deg, #30cfd0 0%, #330867 100%);
      --gradient-7: linear-gradient(135deg, #a8edea 0%, #fed6e3 100%);
      --gradient-8: linear-gradient(135deg, #ff9a9e 0%, #fecfef 100%);
      --gradient-dark: linear-gradient(135deg, #1a1a2e 0%, #16213e 100%);
    }

"#;

pub const ANIMATED_BG_CSS: &str = r#"    /* Animated background */
    body::before {
      content: '';
      position: fixed;
      top: 0;
      left: 0;
      width: 100%;
      height: 100%;
      background-image:
        radial-gradient(circle at 20% 80%, rgba(102, 126, 234, 0.3) 0%, transparent 50%),
        radial-gradient(circle at 80% 20%, rgba(240, 147, 251, 0.3) 0%, transparent 50%),
        radial-gradient(circle at 40% 40%, rgba(79, 172, 254, 0.2) 0%, transparent 50%);
      animation: backgroundShift 20s ease-in-out infinite;
      z-index: -1;
    }

    @keyframes backgroundShift {
      0%, 100% { transform: translate(0, 0) rotate(0deg); }
      33% { transform: translate(-20px, -20px) rotate(120deg); }
      66% { transform: translate(20px, -10px) rotate(240deg); }
    }

"#;

/// Shared glass surfaces: cards, the sticky navigation bar and the orb
/// shapes used by the floating-orbs markup.
pub const GLASS_SURFACES_CSS: &str = r#"    /* Glass cards */
    .glass-card {
      background: rgba(255, 255, 255, 0.1);
      backdrop-filter: blur(20px);
      -webkit-backdrop-filter: blur(20px);
      border-radius: 30px;
      border: 1px solid rgba(255, 255, 255, 0.2);
      padding: 2rem;
      margin-bottom: 2rem;
      box-shadow: 0 8px 32px rgba(0, 0, 0, 0.2);
      color: white;
    }

    /* Glass navigation */
    .navbar-glass {
      background: rgba(255, 255, 255, 0.1);
      backdrop-filter: blur(20px);
      -webkit-backdrop-filter: blur(20px);
      border-bottom: 1px solid rgba(255, 255, 255, 0.2);
      padding: 1rem 0;
      position: sticky;
      top: 0;
      z-index: 1000;
      box-shadow: 0 8px 32px rgba(0, 0, 0, 0.3);
    }

    /* Floating orbs */
    .orb {
      position: absolute;
      border-radius: 50%;
      filter: blur(40px);
      opacity: 0.6;
      animation: float 20s infinite ease-in-out;
    }

    .orb1 {
      width: 300px;
      height: 300px;
      background: radial-gradient(circle, rgba(102, 126, 234, 0.8), transparent);
      top: -150px;
      left: -150px;
    }

    .orb2 {
      width: 400px;
      height: 400px;
      background: radial-gradient(circle, rgba(240, 147, 251, 0.6), transparent);
      bottom: -200px;
      right: -200px;
      animation-delay: -5s;
    }

    .orb3 {
      width: 250px;
      height: 250px;
      background: radial-gradient(circle, rgba(79, 172, 254, 0.7), transparent);
      top: 50%;
      left: 50%;
      animation-delay: -10s;
    }

    @keyframes float {
      0%, 100% { transform: translate(0, 0) scale(1); }
      33% { transform: translate(30px, -30px) scale(1.1); }
      66% { transform: translate(-20px, 20px) scale(0.9); }
    }

"#;

/// Page-wide dark glass theme: body background, brand, hero, forms,
/// buttons, tables, cards, modals and light text. `--glass-surface` is the
/// theme's own marker.
pub const BASE_THEME_CSS: &str = r#"    /* Glass base theme */
    :root {
      --glass-surface: rgba(255, 255, 255, 0.1);
      --glass-border: rgba(255, 255, 255, 0.2);
    }

    body {
      background: #0f0c29;
      background: linear-gradient(to right, #24243e, #302b63, #0f0c29);
      min-height: 100vh;
      font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, Cantarell, sans-serif;
      overflow-x: hidden;
      color: white;
    }

    .navbar-brand {
      color: white !important;
      font-weight: 700;
      font-size: 1.5rem;
      display: flex;
      align-items: center;
      gap: 0.75rem;
      text-decoration: none;
      transition: all 0.3s ease;
    }

    .navbar-brand:hover {
      transform: translateY(-2px);
      text-shadow: 0 5px 15px rgba(255, 255, 255, 0.3);
    }

    .hero-section {
      position: relative;
      padding: 2rem 0 1.5rem;
      text-align: center;
      color: white;
      overflow: hidden;
    }

    .hero-content h1 {
      font-size: 2.5rem;
      font-weight: 800;
      margin-bottom: 1rem;
      background: linear-gradient(to right, #fff, #a8edea, #fed6e3, #fff);
      -webkit-background-clip: text;
      -webkit-text-fill-color: transparent;
      animation: gradientShift 8s ease-in-out infinite;
    }

    @keyframes gradientShift {
      0%, 100% { background-position: 0% 50%; }
      50% { background-position: 100% 50%; }
    }

    .form-control,
    .form-select {
      background: var(--glass-surface);
      border: 2px solid var(--glass-border);
      border-radius: 15px;
      color: white;
      padding: 0.75rem 1rem;
      transition: all 0.3s ease;
    }

    .form-control:focus,
    .form-select:focus {
      background: rgba(255, 255, 255, 0.15);
      border-color: #667eea;
      box-shadow: 0 0 0 3px rgba(102, 126, 234, 0.3);
      color: white;
      outline: none;
    }

    .form-control::placeholder {
      color: rgba(255, 255, 255, 0.7);
    }

    .btn {
      padding: 0.75rem 1.5rem;
      border-radius: 25px;
      font-weight: 600;
      transition: all 0.3s ease;
      border: none;
      text-decoration: none;
      display: inline-flex;
      align-items: center;
      gap: 0.5rem;
    }

    .btn-primary {
      background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
      color: white;
      box-shadow: 0 5px 20px rgba(102, 126, 234, 0.5);
    }

    .btn-primary:hover {
      transform: translateY(-3px);
      box-shadow: 0 10px 40px rgba(102, 126, 234, 0.7);
      color: white;
    }

    .table {
      color: white;
    }

    .table thead th {
      background: rgba(255, 255, 255, 0.15);
      color: white;
      font-weight: 700;
      text-transform: uppercase;
      letter-spacing: 1px;
      padding: 1rem;
      border: none;
    }

    .table tbody tr {
      background: rgba(255, 255, 255, 0.05);
      transition: all 0.3s ease;
    }

    .table tbody tr:hover {
      background: var(--glass-surface);
      transform: translateX(10px);
    }

    h1, h2, h3, h4, h5, h6, p, span, label, a, td, th, li {
      color: white !important;
    }

    .text-muted {
      color: rgba(255, 255, 255, 0.7) !important;
    }

    .card {
      background: var(--glass-surface);
      backdrop-filter: blur(20px);
      -webkit-backdrop-filter: blur(20px);
      border: 1px solid var(--glass-border);
      border-radius: 20px;
      color: white;
    }

    .card-header {
      background: rgba(255, 255, 255, 0.15);
      border-bottom: 1px solid var(--glass-border);
      color: white;
    }

    .modal-content {
      background: rgba(30, 30, 50, 0.95);
      backdrop-filter: blur(20px);
      -webkit-backdrop-filter: blur(20px);
      border: 1px solid var(--glass-border);
      color: white;
    }

    .modal-header {
      border-bottom: 1px solid var(--glass-border);
    }

    .modal-footer {
      border-top: 1px solid var(--glass-border);
    }

    .fade-in {
      opacity: 0;
      transform: translateY(30px);
      animation: fadeInUp 0.8s ease-out forwards;
    }

    @keyframes fadeInUp {
      to {
        opacity: 1;
        transform: translateY(0);
      }
    }

"#;

pub const DARK_THEME_LINK: &str = r#"    <!-- Dark Theme Text Colors -->
    <link rel="stylesheet" href="/static/dark_theme_text.css">
"#;

pub const BOOTSTRAP_LINKS: &str = r#"  <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/css/bootstrap.min.css">
  <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bootstrap-icons@1.11.0/font/bootstrap-icons.css">
"#;

pub const FLOATING_ORBS_HTML: &str = r#"
  <!-- Floating orbs -->
  <div class="orb orb1"></div>
  <div class="orb orb2"></div>
  <div class="orb orb3"></div>
"#;

pub const JQUERY_SCRIPT: &str = r#"  <script src="https://code.jquery.com/jquery-3.7.1.min.js"></script>
"#;

pub const BOOTSTRAP_JS_SCRIPT: &str = r#"  <script src="https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/js/bootstrap.bundle.min.js"></script>
"#;

/// Sign-out control placed at the end of the navigation bar.
pub const LOGOUT_FORM: &str = r#"          <form method="POST" action="/logout" class="m-0">
            <button type="submit" class="btn btn-outline-light btn-sm">
              <i class="bi bi-box-arrow-right"></i> Logout
            </button>
          </form>
"#;

pub const NAVBAR_MARKER: &str = r#"class="navbar"#;
pub const NAVBAR_GLASS: &str = r#"class="navbar navbar-glass"#;

/// Opening tag used when a document has no style block at all.
pub const DEFAULT_STYLE_OPEN_TAG: &str = r#"<style nonce="{{.CSPNonce}}">"#;
