//! Static stylesheet, script and the built-in hidden page.

pub const STYLESHEET: &str = concat!(
    "<style>",
    "*{margin:0;font-family:sans-serif;box-sizing:border-box;}",
    "body{background:#F2F2F2;}",
    "pre,code{font-family:monospace;}",
    ".error-header{background:#252525;color:#DDD;padding:20px;border-left:solid 5px #F66;}",
    ".error-header--fatal{border-color:#9E0000;}",
    ".error-header--parse{border-color:#A721B7;}",
    ".error-header--warning{border-color:#C17929;}",
    ".error-header--notice{border-color:#1BA3B5;}",
    ".error-header--strict{border-color:#A25459;}",
    ".error-header--deprecated{border-color:#6BB796;}",
    ".error-header--exception{border-color:#772673;}",
    ".error-title{font-size:2.5em;}",
    ".error-title--fatal{color:#9E0000;}",
    ".error-title--parse{color:#A721B7;}",
    ".error-title--warning{color:#C17929;}",
    ".error-title--notice{color:#1BA3B5;}",
    ".error-title--strict{color:#A25459;}",
    ".error-title--deprecated{color:#6BB796;}",
    ".error-title--exception{color:#772673;}",
    ".file{padding:5px;font-family:consolas;font-size:0.8em;}",
    ".error-details{background:#CECECE;padding:15px;border-left:solid 5px #252525;}",
    ".code-part{display:none;background:#DCDCDC;border-radius:10px;}",
    ".code-part--active{display:block;}",
    ".code-details{padding:15px 5px;margin:0;background:#252525;color:#CECECE;",
    "border-bottom-right-radius:10px;border-bottom-left-radius:10px;}",
    ".no-source{color:#6F6F6F;padding:0 15px;}",
    ".highlight{width:100%;font-family:inherit;background:rgba(220,100,100,0.7);display:inline-block;}",
    ".column-layout{display:table;width:100%;}",
    ".stacktrace-column{width:40%;display:table-cell;}",
    ".variables{width:60%;display:table-cell;padding:0 20px;border-left:1px dashed #6F6F6F;}",
    ".stacktrace{padding:0;}",
    ".trace{display:block;padding:20px;list-style:none;border-bottom:1px dashed #6F6F6F;cursor:pointer;}",
    ".trace:hover{background:rgba(0,0,250,0.5);}",
    ".variables-list{list-style:none;padding:0;margin-bottom:15px;}",
    ".variable-title{border-bottom:1px dashed #6F6F6F;font-size:2.2em;font-family:monospace;margin-bottom:10px;}",
    ".variable-empty{font-size:0.5em;color:#6F6F6F;}",
    "</style>",
);

/// Clicking a `.trace` entry shows the matching `.code-part-N` panel.
pub const TOGGLE_SCRIPT: &str = concat!(
    "<script>\n",
    "var current = 0;\n",
    "var traces = document.querySelectorAll('.trace');\n",
    "for (var i = 0, len = traces.length; i < len; i++) {\n",
    "    traces[i].addEventListener('click', function () {\n",
    "        if (this.dataset.trace != current) {\n",
    "            document.querySelector('.code-part-' + current).classList.toggle('code-part--active');\n",
    "            document.querySelector('.code-part-' + this.dataset.trace).classList.toggle('code-part--active');\n",
    "            current = this.dataset.trace;\n",
    "        }\n",
    "    }, false);\n",
    "}\n",
    "</script>",
);

pub const HIDDEN_PAGE: &str = concat!(
    "<!DOCTYPE html>",
    "<html>",
    "<head>",
    "<meta charset=\"utf-8\">",
    "<title>Error</title>",
    "<style>",
    "*{margin:0;font-family:sans-serif;box-sizing:border-box;}",
    "body,html{height:100%;}",
    ".wrapper{height:100%;width:100%;display:table;background:#F2F2F2;overflow:hidden;}",
    ".container{display:table-cell;vertical-align:middle;}",
    ".content{position:relative;width:480px;height:360px;margin:auto;background:#252525;",
    "color:#CECECE;border-radius:15px;padding:20px;}",
    ".error-title{color:#9E0000;}",
    "</style>",
    "</head>",
    "<body>",
    "<div class=\"wrapper\">",
    "<div class=\"container\">",
    "<div class=\"content\">",
    "<h1 class=\"error-title\">Server internal error</h1>",
    "<h2>Something went wrong</h2>",
    "<p>Please try again later.</p>",
    "</div>",
    "</div>",
    "</div>",
    "</body>",
    "</html>",
);
